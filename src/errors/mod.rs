use thiserror::Error;

/// Why a tracked player was left out of a scan cycle
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("could not resolve player {tag}: {cause}")]
    Lookup { tag: String, cause: String },
    #[error("could not fetch the battle log of {tag}: {cause}")]
    Fetch { tag: String, cause: String },
}

impl SkipReason {
    pub fn lookup(tag: &str, error: &anyhow::Error) -> Self {
        SkipReason::Lookup {
            tag: tag.to_string(),
            cause: format!("{error:#}"),
        }
    }

    pub fn fetch(tag: &str, error: &anyhow::Error) -> Self {
        SkipReason::Fetch {
            tag: tag.to_string(),
            cause: format!("{error:#}"),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            SkipReason::Lookup { tag, .. } | SkipReason::Fetch { tag, .. } => tag,
        }
    }
}

/// Community management requests that are refused
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("invalid player tag: {0}")]
    InvalidTag(String),
    #[error("no player with tag {0} exists")]
    UnknownPlayer(String),
    #[error("player {0} is already tracked")]
    AlreadyTracked(String),
    #[error("player {0} is not tracked")]
    NotTracked(String),
    #[error("unknown mode: {0}")]
    UnknownMode(String),
    #[error("the stats list can show at most {max} brawlers (got {requested})")]
    TopNTooLarge { requested: usize, max: usize },
    #[error("the stats list must show at least one brawler")]
    TopNZero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_message_names_the_player() {
        let skip = SkipReason::fetch("#2PP", &anyhow::anyhow!("status 503"));

        assert_eq!(skip.tag(), "#2PP");
        assert_eq!(skip.to_string(), "could not fetch the battle log of #2PP: status 503");
    }

    #[test]
    fn test_top_n_message() {
        let error = CommandError::TopNTooLarge { requested: 30, max: 25 };
        assert_eq!(error.to_string(), "the stats list can show at most 25 brawlers (got 30)");
    }
}
