use crate::error::{CoreError, Result};
use crate::types::*;
use std::cell::RefCell;
use uuid::Uuid;

/// A command that can be executed, undone, and described.
pub trait Command: std::fmt::Debug {
    fn execute(&self, comp: &mut Composition) -> Result<()>;
    fn undo(&self, comp: &mut Composition) -> Result<()>;
    fn description(&self) -> &str;
}

/// Undo/redo history stack. All mutations happen synchronously on one
/// logical thread (the model is event-driven), so commands capture their
/// undo state in `RefCell`s without any locking.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_size: usize,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Execute a command and push it onto the undo stack. Clears redo stack.
    /// A failed command leaves both stacks untouched.
    pub fn execute(&mut self, cmd: Box<dyn Command>, comp: &mut Composition) -> Result<()> {
        cmd.execute(comp)?;
        self.redo_stack.clear();
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        Ok(())
    }

    pub fn undo(&mut self, comp: &mut Composition) -> Result<()> {
        let cmd = self.undo_stack.pop().ok_or(CoreError::NothingToUndo)?;
        cmd.undo(comp)?;
        self.redo_stack.push(cmd);
        Ok(())
    }

    pub fn redo(&mut self, comp: &mut Composition) -> Result<()> {
        let cmd = self.redo_stack.pop().ok_or(CoreError::NothingToRedo)?;
        cmd.execute(comp)?;
        self.undo_stack.push(cmd);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|cmd| cmd.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|cmd| cmd.description())
    }
}

fn locate(comp: &Composition, item_id: Uuid) -> Result<(usize, usize)> {
    comp.locate_item(item_id)
        .ok_or(CoreError::ItemNotFound(item_id))
}

// ---------------------------------------------------------------------------
// InsertItemCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct InsertItemCommand {
    track_index: usize,
    item: Item,
}

impl InsertItemCommand {
    pub fn new(track_index: usize, item: Item) -> Self {
        Self { track_index, item }
    }
}

impl Command for InsertItemCommand {
    fn execute(&self, comp: &mut Composition) -> Result<()> {
        comp.insert_item(self.track_index, self.item.clone())
    }

    fn undo(&self, comp: &mut Composition) -> Result<()> {
        let (t, i) = locate(comp, self.item.id())?;
        comp.delete_item(t, i).map(|_| ())
    }

    fn description(&self) -> &str {
        "Add clip"
    }
}

// ---------------------------------------------------------------------------
// DeleteItemCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DeleteItemCommand {
    item_id: Uuid,
    removed: RefCell<Option<(usize, Item)>>,
}

impl DeleteItemCommand {
    pub fn new(item_id: Uuid) -> Self {
        Self {
            item_id,
            removed: RefCell::new(None),
        }
    }
}

impl Command for DeleteItemCommand {
    fn execute(&self, comp: &mut Composition) -> Result<()> {
        let (t, i) = locate(comp, self.item_id)?;
        let item = comp.delete_item(t, i)?;
        *self.removed.borrow_mut() = Some((t, item));
        Ok(())
    }

    fn undo(&self, comp: &mut Composition) -> Result<()> {
        let (track_index, item) = self
            .removed
            .borrow()
            .clone()
            .ok_or_else(|| CoreError::InvalidOperation("no removed item saved".into()))?;
        comp.insert_item(track_index, item)
    }

    fn description(&self) -> &str {
        "Delete clip"
    }
}

// ---------------------------------------------------------------------------
// MoveItemCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MoveItemCommand {
    item_id: Uuid,
    dest_track: usize,
    new_from: Frames,
    origin: RefCell<Option<(usize, Frames)>>,
}

impl MoveItemCommand {
    pub fn new(item_id: Uuid, dest_track: usize, new_from: Frames) -> Self {
        Self {
            item_id,
            dest_track,
            new_from,
            origin: RefCell::new(None),
        }
    }
}

impl Command for MoveItemCommand {
    fn execute(&self, comp: &mut Composition) -> Result<()> {
        let (t, i) = locate(comp, self.item_id)?;
        let old_from = comp.tracks[t].items[i].from();
        comp.move_item(t, i, self.dest_track, self.new_from)?;
        *self.origin.borrow_mut() = Some((t, old_from));
        Ok(())
    }

    fn undo(&self, comp: &mut Composition) -> Result<()> {
        let (origin_track, origin_from) = self
            .origin
            .borrow()
            .ok_or_else(|| CoreError::InvalidOperation("no origin saved".into()))?;
        let (t, i) = locate(comp, self.item_id)?;
        comp.move_item(t, i, origin_track, origin_from)
    }

    fn description(&self) -> &str {
        "Move clip"
    }
}

// ---------------------------------------------------------------------------
// ResizeItemCommand
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ResizeItemCommand {
    item_id: Uuid,
    new_from: Frames,
    new_duration: Frames,
    original: RefCell<Option<(Frames, Frames)>>,
}

impl ResizeItemCommand {
    pub fn new(item_id: Uuid, new_from: Frames, new_duration: Frames) -> Self {
        Self {
            item_id,
            new_from,
            new_duration,
            original: RefCell::new(None),
        }
    }
}

impl Command for ResizeItemCommand {
    fn execute(&self, comp: &mut Composition) -> Result<()> {
        let (t, i) = locate(comp, self.item_id)?;
        let item = &comp.tracks[t].items[i];
        let old = (item.from(), item.duration_in_frames());
        comp.resize_item(t, i, self.new_from, self.new_duration)?;
        *self.original.borrow_mut() = Some(old);
        Ok(())
    }

    fn undo(&self, comp: &mut Composition) -> Result<()> {
        let (old_from, old_duration) = self
            .original
            .borrow()
            .ok_or_else(|| CoreError::InvalidOperation("no original bounds saved".into()))?;
        let (t, i) = locate(comp, self.item_id)?;
        comp.resize_item(t, i, old_from, old_duration)
    }

    fn description(&self) -> &str {
        "Resize clip"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
