//! Generic undo/redo machinery.

/// A reversible operation against some target state.
///
/// `execute` followed by `undo` must leave the target exactly as it was.
pub trait UndoRedoCommand {
    type Target: ?Sized;

    fn execute(&mut self, target: &mut Self::Target);

    fn undo(&mut self, target: &mut Self::Target);
}

impl<C: UndoRedoCommand + ?Sized> UndoRedoCommand for Box<C> {
    type Target = C::Target;

    fn execute(&mut self, target: &mut Self::Target) {
        (**self).execute(target);
    }

    fn undo(&mut self, target: &mut Self::Target) {
        (**self).undo(target);
    }
}

/// Ordered group of sub-commands treated as one unit.
///
/// Executes front to back and undoes back to front, so sub-commands may
/// depend on the positions produced by the ones before them.
#[derive(Debug)]
pub struct UndoRedoCompositeCommand<C> {
    commands: Vec<C>,
    last_invoked: Option<usize>,
}

impl<C> Default for UndoRedoCompositeCommand<C> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            last_invoked: None,
        }
    }
}

impl<C> UndoRedoCompositeCommand<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, command: C) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.last_invoked = None;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.commands.iter()
    }

    /// Sub-command most recently executed or undone.
    pub fn last_invoked(&self) -> Option<&C> {
        self.last_invoked.and_then(|index| self.commands.get(index))
    }
}

impl<C: UndoRedoCommand> UndoRedoCommand for UndoRedoCompositeCommand<C> {
    type Target = C::Target;

    fn execute(&mut self, target: &mut Self::Target) {
        for (index, command) in self.commands.iter_mut().enumerate() {
            command.execute(target);
            self.last_invoked = Some(index);
        }
    }

    fn undo(&mut self, target: &mut Self::Target) {
        for (index, command) in self.commands.iter_mut().enumerate().rev() {
            command.undo(target);
            self.last_invoked = Some(index);
        }
    }
}

/// Two-stack history. Executing a new command discards the redo stack.
#[derive(Debug)]
pub struct UndoRedoHistory<C> {
    undo: Vec<C>,
    redo: Vec<C>,
}

impl<C> Default for UndoRedoHistory<C> {
    fn default() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }
}

impl<C> UndoRedoHistory<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Release stack storage that is no longer in use.
    pub fn trim_excess(&mut self) {
        self.undo.shrink_to_fit();
        self.redo.shrink_to_fit();
    }
}

impl<C: UndoRedoCommand> UndoRedoHistory<C> {
    /// Run `command`, record it for undo, and return the recorded command.
    pub fn execute(&mut self, mut command: C, target: &mut C::Target) -> &C {
        command.execute(target);
        self.redo.clear();
        self.undo.push(command);
        &self.undo[self.undo.len() - 1]
    }

    /// Undo the most recent command, returning it when one existed.
    pub fn try_undo(&mut self, target: &mut C::Target) -> Option<&C> {
        let mut command = self.undo.pop()?;
        command.undo(target);
        self.redo.push(command);
        self.redo.last()
    }

    /// Re-run the most recently undone command, returning it when one existed.
    pub fn try_redo(&mut self, target: &mut C::Target) -> Option<&C> {
        let mut command = self.redo.pop()?;
        command.execute(target);
        self.undo.push(command);
        self.undo.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Appends a word on execute and pops it on undo.
    #[derive(Debug)]
    struct Push(&'static str);

    impl UndoRedoCommand for Push {
        type Target = Vec<&'static str>;

        fn execute(&mut self, target: &mut Self::Target) {
            target.push(self.0);
        }

        fn undo(&mut self, target: &mut Self::Target) {
            assert_eq!(target.pop(), Some(self.0), "undo out of order");
        }
    }

    #[test]
    fn composite_undoes_in_reverse_order() {
        let mut target = Vec::new();
        let mut composite = UndoRedoCompositeCommand::new();
        composite.add(Push("a"));
        composite.add(Push("b"));
        composite.add(Push("c"));

        composite.execute(&mut target);
        assert_eq!(target, vec!["a", "b", "c"]);
        assert_eq!(composite.last_invoked().map(|c| c.0), Some("c"));

        composite.undo(&mut target);
        assert!(target.is_empty());
        assert_eq!(composite.last_invoked().map(|c| c.0), Some("a"));
    }

    #[test]
    fn new_command_after_undo_discards_redo() {
        let mut target = Vec::new();
        let mut history = UndoRedoHistory::new();
        history.execute(Push("a"), &mut target);
        history.execute(Push("b"), &mut target);
        assert_eq!(history.try_undo(&mut target).map(|c| c.0), Some("b"));
        assert!(history.can_redo());

        history.execute(Push("c"), &mut target);
        assert!(!history.can_redo());
        assert_eq!(target, vec!["a", "c"]);

        assert_eq!(history.try_undo(&mut target).map(|c| c.0), Some("c"));
        assert_eq!(history.try_undo(&mut target).map(|c| c.0), Some("a"));
        assert!(history.try_undo(&mut target).is_none());
        assert!(target.is_empty());
    }

    #[test]
    fn redo_replays_forward() {
        let mut target = Vec::new();
        let mut history = UndoRedoHistory::new();
        history.execute(Push("x"), &mut target);
        history.try_undo(&mut target);
        assert!(history.try_redo(&mut target).is_some());
        assert_eq!(target, vec!["x"]);
        assert!(history.try_redo(&mut target).is_none());
        assert_eq!((history.undo_len(), history.redo_len()), (1, 0));

        history.clear();
        history.trim_excess();
        assert!(!history.can_undo());
    }

    #[test]
    fn boxed_commands_dispatch_through_box() {
        let mut target = Vec::new();
        let mut history: UndoRedoHistory<Box<Push>> = UndoRedoHistory::new();
        history.execute(Box::new(Push("boxed")), &mut target);
        history.try_undo(&mut target);
        assert!(target.is_empty());
    }
}
