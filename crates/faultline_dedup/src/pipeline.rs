//! End-to-end processing pipeline.
//!
//! Wires parse → fingerprint → decide → apply over an injected issue
//! store. Everything up to the store calls is a pure function of the
//! document; two fingerprint-identical documents processed concurrently
//! compute the same identity independently, and "only one wins the create"
//! is the store's problem (e.g. a uniqueness constraint).

use crate::decision::{decide, Action, IssueRecord, ReopenPolicy};
use crate::error::Result;
use crate::fingerprint::fingerprint;
use faultline_notice::Notice;

/// External issue store consumed by the pipeline.
///
/// Lookup is scoped by project and tracker, both taken from the notice's
/// routing params; resolving them to real records is the store's policy.
pub trait IssueStore {
    /// Opaque handle to a stored record.
    type Handle;

    /// Finds the record tagged with the given fingerprint, if any.
    fn find_by_fingerprint(
        &self,
        fingerprint: &str,
        project: &str,
        tracker: &str,
    ) -> Option<(Self::Handle, IssueRecord)>;

    /// Creates a record for a newly seen error.
    fn create(&mut self, fingerprint: &str, notice: &Notice) -> Self::Handle;

    /// Updates a record's occurrence count.
    fn update_occurrences(&mut self, handle: &Self::Handle, count: u64);

    /// Reopens a closed record with a journal note, transitioning it back
    /// to the default open state.
    fn reopen(&mut self, handle: &Self::Handle, note: &str);
}

/// Everything the collaborator needs to acknowledge one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The normalized notice.
    pub notice: Notice,
    /// The identity string for this error, equal to the fingerprint.
    pub fingerprint: String,
    /// The decided and applied action.
    pub action: Action,
}

impl Report {
    /// Short identity prefix, as rendered in issue subjects.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.fingerprint.get(..8).unwrap_or(&self.fingerprint)
    }
}

/// Processes one crash-notice document against the issue store.
///
/// # Errors
///
/// Returns the underlying parse error when the document is invalid or
/// declares an unsupported version. Store interactions are infallible by
/// contract; decision-stage failures do not exist (fingerprinting never
/// fails).
pub fn process<S: IssueStore>(
    xml: &str,
    store: &mut S,
    policy: Option<&ReopenPolicy>,
) -> Result<Report> {
    let notice = faultline_notice::parse(xml)?;
    let fingerprint = fingerprint(&notice.error);

    let project = notice.params.get("project").map_or("", String::as_str);
    let tracker = notice.params.get("tracker").map_or("", String::as_str);

    let existing = store.find_by_fingerprint(&fingerprint, project, tracker);
    let action = decide(
        &fingerprint,
        existing.as_ref().map(|(_, record)| record),
        notice.environment_name(),
        policy,
    );

    // decide() returns CreateNew exactly when no record was found.
    if let Some((handle, _)) = existing {
        if let Action::IncrementOccurrence { occurrences, reopen } = &action {
            store.update_occurrences(&handle, *occurrences);
            if let Some(note) = reopen {
                store.reopen(&handle, &note.message());
            }
        }
    } else {
        store.create(&fingerprint, &notice);
    }

    Ok(Report {
        notice,
        fingerprint,
        action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        records: HashMap<String, IssueRecord>,
        reopened: Vec<(String, String)>,
    }

    impl IssueStore for MemoryStore {
        type Handle = String;

        fn find_by_fingerprint(
            &self,
            fingerprint: &str,
            _project: &str,
            _tracker: &str,
        ) -> Option<(String, IssueRecord)> {
            self.records
                .get(fingerprint)
                .map(|record| (fingerprint.to_string(), *record))
        }

        fn create(&mut self, fingerprint: &str, _notice: &Notice) -> String {
            self.records.insert(
                fingerprint.to_string(),
                IssueRecord {
                    occurrences: 1,
                    closed: false,
                },
            );
            fingerprint.to_string()
        }

        fn update_occurrences(&mut self, handle: &String, count: u64) {
            if let Some(record) = self.records.get_mut(handle) {
                record.occurrences = count;
            }
        }

        fn reopen(&mut self, handle: &String, note: &str) {
            if let Some(record) = self.records.get_mut(handle) {
                record.closed = false;
            }
            self.reopened.push((handle.clone(), note.to_string()));
        }
    }

    fn notice_xml(message: &str, environment: &str) -> String {
        format!(
            r#"<notice version="2.4">
                <api-key>{{"api_key": "k", "project": "demo", "tracker": "Bug"}}</api-key>
                <notifier><name>n</name></notifier>
                <error>
                  <class>RuntimeError</class>
                  <message>{message}</message>
                  <backtrace><line file="a.rb" method="save_2_block" number="7"/></backtrace>
                </error>
                <server-environment environment-name="{environment}"/>
            </notice>"#
        )
    }

    #[test]
    fn first_report_creates() {
        let mut store = MemoryStore::default();
        let report = process(&notice_xml("boom", "production"), &mut store, None).unwrap();

        assert!(matches!(
            report.action,
            Action::CreateNew { occurrences: 1, .. }
        ));
        assert_eq!(store.records[&report.fingerprint].occurrences, 1);
        assert_eq!(report.short_id().len(), 8);
    }

    #[test]
    fn repeat_report_increments() {
        let mut store = MemoryStore::default();
        let first = process(&notice_xml("boom", "production"), &mut store, None).unwrap();
        // Same error from another run, different generated block id.
        let xml = notice_xml("boom", "production").replace("save_2_block", "save_9_block");
        let second = process(&xml, &mut store, None).unwrap();

        assert_eq!(first.fingerprint, second.fingerprint);
        assert!(matches!(
            second.action,
            Action::IncrementOccurrence {
                occurrences: 2,
                reopen: None,
            }
        ));
        assert_eq!(store.records[&second.fingerprint].occurrences, 2);
    }

    #[test]
    fn different_errors_do_not_collide() {
        let mut store = MemoryStore::default();
        let a = process(&notice_xml("boom", "production"), &mut store, None).unwrap();
        let b = process(&notice_xml("bang", "production"), &mut store, None).unwrap();

        assert_ne!(a.fingerprint, b.fingerprint);
        assert_eq!(store.records.len(), 2);
    }

    #[test]
    fn closed_record_reopens_when_policy_matches() {
        let mut store = MemoryStore::default();
        let policy = ReopenPolicy::new("stag.*").unwrap();

        let first = process(&notice_xml("boom", "staging"), &mut store, Some(&policy)).unwrap();
        store
            .records
            .get_mut(&first.fingerprint)
            .unwrap()
            .closed = true;

        let second = process(&notice_xml("boom", "staging"), &mut store, Some(&policy)).unwrap();
        let Action::IncrementOccurrence { reopen, .. } = &second.action else {
            panic!("expected increment");
        };
        assert!(reopen.is_some());
        assert!(!store.records[&second.fingerprint].closed);
        assert_eq!(store.reopened.len(), 1);
        assert!(store.reopened[0].1.contains("staging"));
    }

    #[test]
    fn closed_record_stays_closed_when_policy_does_not_match() {
        let mut store = MemoryStore::default();
        let policy = ReopenPolicy::new("prod").unwrap();

        let first = process(&notice_xml("boom", "staging"), &mut store, Some(&policy)).unwrap();
        store
            .records
            .get_mut(&first.fingerprint)
            .unwrap()
            .closed = true;

        let second = process(&notice_xml("boom", "staging"), &mut store, Some(&policy)).unwrap();
        assert!(matches!(
            second.action,
            Action::IncrementOccurrence { reopen: None, .. }
        ));
        assert!(store.records[&second.fingerprint].closed);
        assert!(store.reopened.is_empty());
    }

    #[test]
    fn invalid_document_is_surfaced() {
        let mut store = MemoryStore::default();
        let result = process("<notice version=\"2.4\"/>", &mut store, None);
        assert!(result.is_err());
        assert!(store.records.is_empty());
    }
}
