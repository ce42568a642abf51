use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use parking_lot::Mutex;

use crate::model::{
    candidate::{Candidate, CandidateId},
    user::User,
};

use super::{
    ElectionStore, StoreData, StoreError, CANDIDATES_KEY, USERS_KEY, VOTING_END_TIME_KEY,
};

/// A file-backed store.
///
/// The on-disk document is one JSON object mapping the stable keys to
/// JSON-encoded string values, exactly the shape browser local storage keeps:
/// `users` and `candidates` hold encoded record arrays, `votingEndTime` holds
/// a stringified epoch-millisecond timestamp. The whole document is rewritten
/// through a temp-file rename on every commit, so a ballot lands with both
/// its tally and voter updates or not at all.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => decode(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store file at {}, starting empty", path.display());
                StoreData::default()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Run a mutation transactionally: it is applied to a draft, the draft
    /// is persisted, and only then does it become visible to readers. An IO
    /// failure leaves both memory and disk on the previous state.
    fn with_write<T>(
        &self,
        mutate: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut data = self.data.lock();
        let mut draft = data.clone();
        let out = mutate(&mut draft)?;
        self.persist(&draft)?;
        *data = draft;
        Ok(out)
    }

    fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let encoded = encode(data)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ElectionStore for FileStore {
    fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.data.lock().users.clone())
    }

    fn user(&self, student_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.data.lock().user(student_id).cloned())
    }

    fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.with_write(|data| data.insert_user(user))
    }

    fn candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.data.lock().candidates.clone())
    }

    fn init_candidates(&self, candidates: Vec<Candidate>) -> Result<bool, StoreError> {
        self.with_write(|data| {
            if data.candidates.is_empty() {
                data.candidates = candidates;
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    fn voting_end_time(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.data.lock().voting_end_time)
    }

    fn set_voting_end_time(&self, end: DateTime<Utc>) -> Result<(), StoreError> {
        self.with_write(|data| {
            data.voting_end_time = Some(end);
            Ok(())
        })
    }

    fn init_voting_end_time(&self, end: DateTime<Utc>) -> Result<bool, StoreError> {
        self.with_write(|data| {
            if data.voting_end_time.is_none() {
                data.voting_end_time = Some(end);
                Ok(true)
            } else {
                Ok(false)
            }
        })
    }

    fn record_ballot(
        &self,
        student_id: &str,
        selected: &BTreeSet<CandidateId>,
    ) -> Result<User, StoreError> {
        self.with_write(|data| data.record_ballot(student_id, selected))
    }
}

fn encode(data: &StoreData) -> Result<String, StoreError> {
    let mut map = BTreeMap::new();
    map.insert(USERS_KEY, serde_json::to_string(&data.users)?);
    map.insert(CANDIDATES_KEY, serde_json::to_string(&data.candidates)?);
    if let Some(end) = data.voting_end_time {
        map.insert(VOTING_END_TIME_KEY, end.timestamp_millis().to_string());
    }
    Ok(serde_json::to_string_pretty(&map)?)
}

fn decode(contents: &str) -> Result<StoreData, StoreError> {
    let map: BTreeMap<String, String> = serde_json::from_str(contents)?;
    let users = match map.get(USERS_KEY) {
        Some(blob) => serde_json::from_str(blob)?,
        None => Vec::new(),
    };
    let candidates = match map.get(CANDIDATES_KEY) {
        Some(blob) => serde_json::from_str(blob)?,
        None => Vec::new(),
    };
    let voting_end_time = match map.get(VOTING_END_TIME_KEY) {
        Some(raw) => {
            let millis: i64 = raw
                .parse()
                .map_err(|_| StoreError::BadTimestamp(raw.clone()))?;
            let end = Utc
                .timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| StoreError::BadTimestamp(raw.clone()))?;
            Some(end)
        }
        None => None,
    };
    Ok(StoreData {
        users,
        candidates,
        voting_end_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;

    /// Use a random path to avoid collisions between tests.
    fn temp_store_path() -> PathBuf {
        let random: u32 = rand::random();
        std::env::temp_dir().join(format!("campus-vote-test-{random}.json"))
    }

    #[test]
    fn survives_a_reopen() {
        let path = temp_store_path();
        let end = Utc::now() + Duration::hours(3);

        {
            let store = FileStore::open(&path).unwrap();
            store.init_candidates(Candidate::seed()).unwrap();
            store.insert_user(User::example_admin()).unwrap();
            store.insert_user(User::example()).unwrap();
            store.set_voting_end_time(end).unwrap();
            store
                .record_ballot("S1001", &BTreeSet::from([3, 4]))
                .unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        let user = reopened.user("S1001").unwrap().unwrap();
        assert!(user.has_voted);
        assert_eq!(user.voted_candidate_ids, BTreeSet::from([3, 4]));
        let candidates = reopened.candidates().unwrap();
        assert_eq!(candidates[2].vote_count, 1);
        // Millisecond precision survives the stringified timestamp.
        assert_eq!(
            reopened.voting_end_time().unwrap().unwrap().timestamp_millis(),
            end.timestamp_millis()
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn disk_document_keeps_the_stable_key_shapes() {
        let path = temp_store_path();
        let store = FileStore::open(&path).unwrap();
        store.init_candidates(Candidate::seed()).unwrap();
        store.init_voting_end_time(Utc::now()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert!(map.contains_key(USERS_KEY));
        assert!(map.contains_key(CANDIDATES_KEY));
        // The end time is a stringified epoch-millisecond integer.
        assert!(map[VOTING_END_TIME_KEY].parse::<i64>().is_ok());
        // The users value is itself a JSON-encoded array.
        assert!(serde_json::from_str::<Vec<User>>(&map[USERS_KEY]).is_ok());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn rejects_a_corrupt_end_time() {
        let path = temp_store_path();
        fs::write(&path, r#"{"votingEndTime": "three o'clock"}"#).unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::BadTimestamp(_)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_transaction_leaves_no_trace() {
        let path = temp_store_path();
        let store = FileStore::open(&path).unwrap();
        store.init_candidates(Candidate::seed()).unwrap();
        store.insert_user(User::example()).unwrap();

        let err = store
            .record_ballot("S1001", &BTreeSet::from([3, 99]))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownCandidate(99)));

        // Neither memory nor disk saw a partial update.
        assert!(store.candidates().unwrap().iter().all(|c| c.vote_count == 0));
        let reopened = FileStore::open(&path).unwrap();
        assert!(!reopened.user("S1001").unwrap().unwrap().has_voted);
        assert!(reopened.candidates().unwrap().iter().all(|c| c.vote_count == 0));

        fs::remove_file(&path).unwrap();
    }
}
