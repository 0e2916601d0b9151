use crate::domain::Session;

/// Sessions known to the correlator
///
/// `open` sessions wait for more games. `retired` sessions completed during
/// the current cycle and are kept only so that the other team's report of
/// the deciding game is recognised as a duplicate.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    open: Vec<Session>,
    retired: Vec<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> &[Session] {
        &self.open
    }

    pub fn retired(&self) -> &[Session] {
        &self.retired
    }

    pub fn clear_retired(&mut self) {
        self.retired.clear();
    }

    pub(super) fn open_mut(&mut self, index: usize) -> &mut Session {
        &mut self.open[index]
    }

    pub(super) fn insert(&mut self, session: Session) {
        self.open.push(session);
    }

    pub(super) fn retire(&mut self, index: usize) -> Session {
        let session = self.open.remove(index);
        self.retired.push(session.clone());
        session
    }

    /// Remove every open session matching `predicate`, in insertion order
    pub(super) fn discard_where<F>(&mut self, mut predicate: F) -> Vec<Session>
    where
        F: FnMut(&Session) -> bool,
    {
        let (discarded, kept): (Vec<Session>, Vec<Session>) = std::mem::take(&mut self.open)
            .into_iter()
            .partition(|session| predicate(session));
        self.open = kept;
        discarded
    }
}
