//! Undo/Redo system for landmark edits.
//!
//! Each undoable action is represented as a [`Command`] carrying enough
//! information to reverse itself. The stack only records; applying commands
//! to a model is done by `LandmarkModel::undo` / `LandmarkModel::redo`.

use crate::format::ModelSchema;
use crate::model::{GroupId, MarkerHandle, Point};

// ============================================================================
// Command Types
// ============================================================================

/// A command that can be undone and redone.
#[derive(Debug, Clone)]
pub enum Command {
    /// A marker was dragged
    MoveMarker {
        /// The marker that moved
        handle: MarkerHandle,
        /// Scene position before the move
        from: Point,
        /// Scene position after the move
        to: Point,
    },
    /// A whole group was dragged
    MoveGroup {
        /// The group that moved
        group: GroupId,
        /// Horizontal displacement
        dx: f64,
        /// Vertical displacement
        dy: f64,
    },
    /// The model was rebuilt (scale, point added or removed)
    Restore {
        /// Description of the operation
        description: String,
        /// Model before the operation
        before: ModelSchema,
        /// Model after the operation
        after: ModelSchema,
    },
}

impl Command {
    /// Get a human-readable description of this command
    pub fn description(&self) -> String {
        match self {
            Command::MoveMarker { handle, .. } => format!("Move point {}", handle.index),
            Command::MoveGroup { .. } => "Move group".to_string(),
            Command::Restore { description, .. } => description.clone(),
        }
    }

    /// The command that reverses this one.
    pub fn inverse(&self) -> Command {
        match self {
            Command::MoveMarker { handle, from, to } => Command::MoveMarker {
                handle: *handle,
                from: *to,
                to: *from,
            },
            Command::MoveGroup { group, dx, dy } => Command::MoveGroup {
                group: *group,
                dx: -dx,
                dy: -dy,
            },
            Command::Restore {
                description,
                before,
                after,
            } => Command::Restore {
                description: description.clone(),
                before: after.clone(),
                after: before.clone(),
            },
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// Configuration for the undo stack
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of commands to keep in history
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self { max_history: 100 }
    }
}

/// The undo/redo history stack.
///
/// Pushing a new command clears the redo stack. Undo moves the most recent
/// command to the redo stack and redo moves it back.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    /// Configuration
    config: UndoConfig,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Push a command to the undo stack.
    /// This clears the redo stack (can't redo after a new action).
    pub fn push(&mut self, command: Command) {
        log::debug!("Undo: pushed '{}'", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        // Limit history size
        while self.undo_stack.len() > self.config.max_history {
            self.undo_stack.remove(0);
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

    /// Pop a command for undoing; it moves to the redo stack.
    pub fn pop_undo(&mut self) -> Option<Command> {
        let cmd = self.undo_stack.pop()?;
        log::debug!("Undo: '{}'", cmd.description());
        self.redo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Pop a command for redoing; it moves back to the undo stack.
    pub fn pop_redo(&mut self) -> Option<Command> {
        let cmd = self.redo_stack.pop()?;
        log::debug!("Redo: '{}'", cmd.description());
        self.undo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Get the description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get the description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("Undo history cleared");
    }

    /// Get the number of commands in undo history
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in redo history
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_cmd(index: usize) -> Command {
        Command::MoveMarker {
            handle: MarkerHandle::new(GroupId(0), index),
            from: Point::new(0.0, 0.0),
            to: Point::new(1.0, 1.0),
        }
    }

    #[test]
    fn test_push_clears_redo() {
        let mut stack = UndoStack::new();
        stack.push(move_cmd(0));
        stack.push(move_cmd(1));
        assert_eq!(stack.undo_count(), 2);

        stack.pop_undo();
        assert!(stack.can_redo());

        stack.push(move_cmd(2));
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_description().as_deref(), Some("Move point 2"));
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut stack = UndoStack::new();
        stack.push(move_cmd(3));

        assert!(stack.pop_undo().is_some());
        assert!(!stack.can_undo());
        assert_eq!(stack.redo_count(), 1);

        assert!(stack.pop_redo().is_some());
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
        assert!(stack.pop_redo().is_none());
    }

    #[test]
    fn test_history_limit() {
        let mut stack = UndoStack::with_config(UndoConfig { max_history: 3 });
        for i in 0..5 {
            stack.push(move_cmd(i));
        }
        assert_eq!(stack.undo_count(), 3);
        assert_eq!(stack.undo_description().as_deref(), Some("Move point 4"));
    }

    #[test]
    fn test_inverse_swaps_endpoints() {
        let cmd = Command::MoveGroup {
            group: GroupId(1),
            dx: 3.0,
            dy: -2.0,
        };
        match cmd.inverse() {
            Command::MoveGroup { group, dx, dy } => {
                assert_eq!(group, GroupId(1));
                assert_eq!((dx, dy), (-3.0, 2.0));
            }
            other => panic!("unexpected inverse {:?}", other),
        }

        match move_cmd(0).inverse() {
            Command::MoveMarker { from, to, .. } => {
                assert_eq!(from, Point::new(1.0, 1.0));
                assert_eq!(to, Point::new(0.0, 0.0));
            }
            other => panic!("unexpected inverse {:?}", other),
        }
    }
}
