use serde::{Deserialize, Serialize};

/// One of the four interchangeable layouts over the same filtered page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    List,
    Grid,
    Board,
}

/// Name of the route query parameter the view mode round-trips through.
pub const VIEW_PARAM: &str = "view";

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::List => "list",
            ViewMode::Grid => "grid",
            ViewMode::Board => "board",
        }
    }

    /// Parse a mode name; unrecognized or empty input falls back to
    /// [`ViewMode::Table`].
    pub fn parse(s: &str) -> ViewMode {
        match s {
            "list" => ViewMode::List,
            "grid" => ViewMode::Grid,
            "board" => ViewMode::Board,
            _ => ViewMode::Table,
        }
    }

    pub fn next(&self) -> ViewMode {
        match self {
            ViewMode::Table => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Board,
            ViewMode::Board => ViewMode::Table,
        }
    }

    /// Read the mode from a route query string (`a=1&view=board`).
    ///
    /// This and [`ViewMode::patch_query`] are the whole of the
    /// route synchronization contract: the host hands in its current
    /// query string and applies the returned one. Nothing here reaches
    /// into ambient navigation state.
    pub fn from_query(query: &str) -> ViewMode {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == VIEW_PARAM)
            .map(|(_, value)| ViewMode::parse(value))
            .unwrap_or_default()
    }

    /// Return `query` with the `view` parameter set to this mode,
    /// preserving every other parameter and its position.
    pub fn patch_query(&self, query: &str) -> String {
        let mut pairs: Vec<String> = Vec::new();
        let mut patched = false;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((name, _)) if name == VIEW_PARAM => {
                    pairs.push(format!("{}={}", VIEW_PARAM, self.as_str()));
                    patched = true;
                }
                _ => pairs.push(pair.to_string()),
            }
        }
        if !patched {
            pairs.push(format!("{}={}", VIEW_PARAM, self.as_str()));
        }
        pairs.join("&")
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
