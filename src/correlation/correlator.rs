use log::debug;

use super::store::SessionStore;
use crate::domain::{GameResult, Match, Session};

/// A session that just reached its terminal condition
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCompleted {
    pub session: Session,
    /// Outcome of the deciding game, from the reporter's perspective
    pub deciding: GameResult,
}

impl SessionCompleted {
    pub fn results(&self) -> &[GameResult] {
        self.session.results()
    }
}

/// What the correlator did with a match
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The result was appended to an open session that is still open
    Advanced(Session),
    /// The result was appended and the session is now complete and retired
    Completed(SessionCompleted),
    /// The game is already tracked from the other team's perspective
    Duplicate,
    /// A new session was opened, replacing the reporter's stale sessions
    Started {
        session: Session,
        discarded: Vec<Session>,
    },
}

impl Outcome {
    /// The session a game result was just recorded on, if any
    pub fn recorded_on(&self) -> Option<&Session> {
        match self {
            Outcome::Advanced(session) => Some(session),
            Outcome::Completed(completed) => Some(&completed.session),
            Outcome::Started { session, .. } => Some(session),
            Outcome::Duplicate => None,
        }
    }
}

/// Attribute a match to a session
///
/// Checks run in a fixed order: advance or duplicate against open sessions,
/// duplicate against sessions retired this cycle, then stale discard, then a
/// new session.
pub fn correlate(game: &Match, store: &mut SessionStore) -> Outcome {
    if let Some(index) = find_open(store, |s| s.is_same_game(game) && s.is_reported_by(game)) {
        return advance(store, index, game.result);
    }

    if store.open().iter().any(|s| s.is_same_game(game)) {
        debug!("{} reported a game already tracked from the other side", game.reporter);
        return Outcome::Duplicate;
    }

    if store
        .retired()
        .iter()
        .any(|s| s.is_same_game(game) && !s.is_reported_by(game))
    {
        debug!("{} reported the deciding game of a finished session", game.reporter);
        return Outcome::Duplicate;
    }

    let discarded = store.discard_where(|s| s.is_superseded_by(game));
    if !discarded.is_empty() {
        debug!(
            "Discarded {} unfinished session(s) of {}",
            discarded.len(),
            game.reporter
        );
    }

    let session = Session::start(game);
    store.insert(session.clone());
    debug!(
        "Started session of {} on {} ({})",
        session.reporter, session.map, session.mode
    );
    Outcome::Started { session, discarded }
}

fn find_open<F>(store: &SessionStore, predicate: F) -> Option<usize>
where
    F: Fn(&Session) -> bool,
{
    store.open().iter().position(predicate)
}

fn advance(store: &mut SessionStore, index: usize, result: GameResult) -> Outcome {
    let completed = store.open_mut(index).record(result);

    if completed {
        let session = store.retire(index);
        debug!(
            "Session of {} on {} finished: {:?}",
            session.reporter,
            session.map,
            session.results()
        );
        Outcome::Completed(SessionCompleted {
            session,
            deciding: result,
        })
    } else {
        Outcome::Advanced(store.open()[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::GameResult::{Defeat, Victory};
    use crate::domain::session::fixtures::*;

    const OTHERS: [(&str, &str); 3] = [("Gus", "PIPER"), ("Hal", "MORTIS"), ("Ivy", "SPIKE")];

    #[test]
    fn test_first_game_starts_a_session() {
        let mut store = SessionStore::new();

        let outcome = correlate(&game("Ann", HOME, AWAY, Victory), &mut store);

        assert!(matches!(outcome, Outcome::Started { ref discarded, .. } if discarded.is_empty()));
        assert_eq!(store.open().len(), 1);
        assert_eq!(store.open()[0].results(), &[Victory]);
    }

    #[test]
    fn test_same_reporter_advances_until_complete() {
        let mut store = SessionStore::new();
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);

        let second = correlate(&game("Ann", HOME, AWAY, Defeat), &mut store);
        assert!(matches!(second, Outcome::Advanced(ref s) if s.results() == [Victory, Defeat]));

        let third = correlate(&game("Ann", HOME, AWAY, Victory), &mut store);
        let Outcome::Completed(done) = third else {
            panic!("expected completion");
        };
        assert_eq!(done.results(), &[Victory, Defeat, Victory]);
        assert_eq!(done.deciding, Victory);
        assert!(store.open().is_empty());
        assert_eq!(store.retired().len(), 1);
    }

    #[test]
    fn test_other_team_report_is_a_duplicate() {
        let mut store = SessionStore::new();
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);

        let outcome = correlate(&game("Dan", AWAY, HOME, Defeat), &mut store);

        assert_eq!(outcome, Outcome::Duplicate);
        assert_eq!(store.open().len(), 1);
        assert_eq!(store.open()[0].results(), &[Victory]);
    }

    #[test]
    fn test_late_report_of_deciding_game_does_not_spawn_a_session() {
        let mut store = SessionStore::new();
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);

        let outcome = correlate(&game("Dan", AWAY, HOME, Defeat), &mut store);

        assert_eq!(outcome, Outcome::Duplicate);
        assert!(store.open().is_empty());
    }

    #[test]
    fn test_retired_sessions_only_dedupe_within_a_cycle() {
        let mut store = SessionStore::new();
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);
        store.clear_retired();

        let outcome = correlate(&game("Dan", AWAY, HOME, Defeat), &mut store);

        assert!(matches!(outcome, Outcome::Started { .. }));
    }

    #[test]
    fn test_new_roster_discards_stale_session() {
        let mut store = SessionStore::new();
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);

        let outcome = correlate(&game("Ann", HOME, OTHERS, Defeat), &mut store);

        let Outcome::Started { session, discarded } = outcome else {
            panic!("expected a new session");
        };
        assert_eq!(discarded.len(), 1);
        assert_eq!(discarded[0].team_b, team(AWAY));
        assert_eq!(session.results(), &[Defeat]);
        assert_eq!(store.open().len(), 1);
        assert_eq!(store.open()[0].team_b, team(OTHERS));
    }

    #[test]
    fn test_duplicate_does_not_discard_reporters_other_session() {
        let mut store = SessionStore::new();
        correlate(&game("Ann", HOME, OTHERS, Victory), &mut store);
        correlate(&game("Dan", AWAY, HOME, Victory), &mut store);

        // Ann reports the game Dan already anchors
        let outcome = correlate(&game("Ann", HOME, AWAY, Defeat), &mut store);

        assert_eq!(outcome, Outcome::Duplicate);
        assert_eq!(store.open().len(), 2);
    }

    #[test]
    fn test_sessions_are_scoped_to_their_channel() {
        let mut store = SessionStore::new();
        let first = game("Ann", HOME, AWAY, Victory);
        let mut elsewhere = first.clone();
        elsewhere.channel = crate::domain::ChannelRef::new("other-room");

        correlate(&first, &mut store);
        let outcome = correlate(&elsewhere, &mut store);

        assert!(matches!(outcome, Outcome::Started { ref discarded, .. } if discarded.is_empty()));
        assert_eq!(store.open().len(), 2);
    }

    #[test]
    fn test_alternating_results_never_repeat_after_a_discard() {
        let mut store = SessionStore::new();
        correlate(&game("Ann", HOME, AWAY, Victory), &mut store);
        correlate(&game("Ann", HOME, AWAY, Defeat), &mut store);

        let outcome = correlate(&game("Ann", HOME, OTHERS, Victory), &mut store);

        assert!(matches!(outcome, Outcome::Started { ref discarded, .. } if discarded.len() == 1));
        assert!(store.retired().is_empty());
    }
}
