use crate::error::LookupError;

/// Shown when the backend answered but had nothing to say
pub const FALLBACK_EXPLANATION: &str = "The backend did not provide an analysis.";
/// Shown for every failed lookup; the cause only goes to the log
pub const LOOKUP_ERROR_MESSAGE: &str =
    "Sorry, an error occurred while trying to get the analysis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Pending,
    Resolved,
    Failed,
}

/// The live lookup and what is known about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionQuery {
    pub seq: u64,
    pub selected_text: String,
    pub status: QueryStatus,
    pub result_text: Option<String>,
}

/// What the caller needs to run the request and report back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub text: String,
}

/// Holds the single live query slot.
///
/// Every `begin` takes a fresh sequence number; `complete` only applies an
/// outcome whose number matches the live query, so a slow older request can
/// never overwrite a newer one.
#[derive(Debug, Default)]
pub struct DefinitionFetcher {
    next_seq: u64,
    live: Option<DefinitionQuery>,
}

impl DefinitionFetcher {
    /// Supersede the live query with a pending one for `selected_text`.
    /// Returns `None` (and changes nothing) for blank text.
    pub fn begin(&mut self, selected_text: &str) -> Option<QueryTicket> {
        let text = selected_text.trim();
        if text.is_empty() {
            return None;
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.live = Some(DefinitionQuery {
            seq,
            selected_text: text.to_string(),
            status: QueryStatus::Pending,
            result_text: None,
        });

        Some(QueryTicket {
            seq,
            text: text.to_string(),
        })
    }

    /// Apply the outcome of request `seq`. Returns false when it was stale and dropped.
    pub fn complete(&mut self, seq: u64, outcome: Result<Option<String>, LookupError>) -> bool {
        let query = match self.live.as_mut() {
            Some(q) if q.seq == seq => q,
            _ => {
                log::debug!("Discarding stale lookup #{seq}");
                return false;
            }
        };

        match outcome {
            Ok(explanation) => {
                query.status = QueryStatus::Resolved;
                query.result_text = Some(
                    explanation
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| FALLBACK_EXPLANATION.to_string()),
                );
            }
            Err(e) => {
                log::warn!("Lookup #{seq} for {:?} failed: {e}", query.selected_text);
                query.status = QueryStatus::Failed;
                query.result_text = Some(LOOKUP_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    pub fn live(&self) -> Option<&DefinitionQuery> {
        self.live.as_ref()
    }

    /// Forget the live query; any outcome still in flight becomes stale
    pub fn clear(&mut self) {
        self.live = None;
    }
}
