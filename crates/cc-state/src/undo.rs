//! Undo/Redo system using command pattern
//!
//! Commands operate on an explicit target (`&mut T`) instead of capturing
//! shared state, so the owner of the data can also own its history.

use std::collections::VecDeque;
use std::fmt;

/// Default number of undo steps kept
pub const DEFAULT_MAX_HISTORY: usize = 500;

/// Trait for undoable commands on a target of type `T`
pub trait Command<T>: Send + Sync {
    /// Execute the command
    fn execute(&mut self, target: &mut T);

    /// Undo the command
    fn undo(&mut self, target: &mut T);

    /// Get command name for display
    fn name(&self) -> &str;
}

/// Undo/Redo manager
pub struct UndoManager<T> {
    undo_stack: VecDeque<Box<dyn Command<T>>>,
    redo_stack: Vec<Box<dyn Command<T>>>,
    max_history: usize,
    group_depth: usize,
    group_commands: Vec<Box<dyn Command<T>>>,
}

impl<T: 'static> UndoManager<T> {
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history.min(64)),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
            group_depth: 0,
            group_commands: Vec::new(),
        }
    }

    /// Execute a command on `target` and add it to the undo stack
    pub fn execute(&mut self, mut command: Box<dyn Command<T>>, target: &mut T) {
        command.execute(target);

        if self.group_depth > 0 {
            self.group_commands.push(command);
        } else {
            self.push_command(command);
        }

        // Clear redo stack on new command
        self.redo_stack.clear();
    }

    fn push_command(&mut self, command: Box<dyn Command<T>>) {
        while self.undo_stack.len() >= self.max_history {
            self.undo_stack.pop_front();
        }

        self.undo_stack.push_back(command);
    }

    /// Undo the last command
    pub fn undo(&mut self, target: &mut T) -> bool {
        if self.group_depth > 0 {
            log::warn!("Undo requested inside an open group; ignored");
            return false;
        }

        if let Some(mut command) = self.undo_stack.pop_back() {
            command.undo(target);
            self.redo_stack.push(command);
            true
        } else {
            false
        }
    }

    /// Redo the last undone command
    pub fn redo(&mut self, target: &mut T) -> bool {
        if self.group_depth > 0 {
            log::warn!("Redo requested inside an open group; ignored");
            return false;
        }

        if let Some(mut command) = self.redo_stack.pop() {
            command.execute(target);
            self.undo_stack.push_back(command);
            true
        } else {
            false
        }
    }

    /// Start a command group (grouped commands are undone/redone together)
    pub fn begin_group(&mut self) {
        self.group_depth += 1;
    }

    /// End a command group. The outermost group becomes one undo step named `name`.
    pub fn end_group(&mut self, name: &str) {
        if self.group_depth > 0 {
            self.group_depth -= 1;

            if self.group_depth == 0 && !self.group_commands.is_empty() {
                let commands = std::mem::take(&mut self.group_commands);
                log::debug!("Closing undo group '{}' ({} commands)", name, commands.len());
                let group = GroupCommand::new(name.to_string(), commands);
                self.push_command(Box::new(group));
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the name of the next undo command
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.name())
    }

    /// Get the name of the next redo command
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.name())
    }

    /// Get number of undo steps
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}

impl<T: 'static> Default for UndoManager<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl<T> fmt::Debug for UndoManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoManager")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("group_depth", &self.group_depth)
            .finish()
    }
}

/// Group of commands that are undone/redone together
struct GroupCommand<T> {
    name: String,
    commands: Vec<Box<dyn Command<T>>>,
}

impl<T> GroupCommand<T> {
    fn new(name: String, commands: Vec<Box<dyn Command<T>>>) -> Self {
        Self { name, commands }
    }
}

impl<T> Command<T> for GroupCommand<T> {
    fn execute(&mut self, target: &mut T) {
        for cmd in &mut self.commands {
            cmd.execute(target);
        }
    }

    fn undo(&mut self, target: &mut T) {
        for cmd in self.commands.iter_mut().rev() {
            cmd.undo(target);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
