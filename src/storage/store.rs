//! A file backed store of questions
//!
//! The [`QuestionStore`] owns every [`Question`] and the [`ThreadIndex`] over
//! them. It reads the whole question file once when loaded and rewrites the
//! whole file after every mutation, so the file is consistent whenever a
//! mutating call returns successfully.
//!
//! The store assumes it is the only writer of its file. Two processes
//! mutating the same file will silently overwrite each other's changes.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::{
        validate_text, Config, NewQuestion, Question, QuestionId, TextError, ThreadIndex, UserId,
        UserLookup,
    },
    storage::{
        codec::{decode_question, encode_question},
        lines,
    },
};

/// An in-memory reflection of the question file.
#[derive(Debug)]
pub struct QuestionStore {
    /// The file questions are persisted to.
    path: PathBuf,

    /// All questions, keyed (and therefore ordered) by id.
    questions: BTreeMap<QuestionId, Question>,

    /// Threads over `questions`. Rebuilt whenever the question set changes.
    threads: ThreadIndex,

    /// The highest id handed out or observed so far.
    last_id: u32,
}

/// What an answer replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The question had no answer before.
    Answered,
    /// An existing answer was overwritten.
    Overwritten {
        /// The answer that was replaced.
        previous: String,
    },
}

/// Errors returned by [`QuestionStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The question file could not be written.
    ///
    /// The in-memory mutation is kept, so memory and disk disagree until the
    /// next successful save.
    #[error("question storage at {} is unavailable", .path.display())]
    StorageUnavailable {
        /// The question file.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// No question has the given id.
    #[error("no question with id {0}")]
    NotFound(QuestionId),
    /// The given id is not the root of an existing thread.
    #[error("question {0} is not the root of a thread")]
    InvalidParent(QuestionId),
    /// No user has the given id.
    #[error("no user with id {0}")]
    UserNotFound(UserId),
    /// The recipient does not accept anonymous questions.
    #[error("user {0} does not accept anonymous questions")]
    AnonymousNotAllowed(UserId),
    /// The question was addressed to someone else.
    #[error("question {question} was not addressed to user {user}")]
    NotAddressedTo {
        /// The question.
        question: QuestionId,
        /// The user who tried to act on it.
        user: UserId,
    },
    /// Every question id has been handed out.
    #[error("no question ids left to allocate")]
    IdsExhausted,
    /// The supplied text cannot be stored.
    #[error(transparent)]
    InvalidText(#[from] TextError),
}

impl QuestionStore {
    /// Loads the store from the questions file configured for `root`.
    #[must_use]
    pub fn open(root: &Path, config: &Config) -> Self {
        Self::load(config.questions_path(root))
    }

    /// Loads every question from the file at `path`.
    ///
    /// A file that cannot be read yields an empty store, since it may simply
    /// not exist yet. Lines that do not decode are skipped with a warning.
    #[must_use]
    #[instrument]
    pub fn load(path: PathBuf) -> Self {
        let records = match lines::read_lines(&path) {
            Ok(records) => records,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No question file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot read question file {}, starting empty: {e}",
                    path.display()
                );
                Vec::new()
            }
        };

        let mut questions = BTreeMap::new();
        for (number, line) in records.iter().enumerate() {
            match decode_question(line) {
                Ok(question) => {
                    if let Some(previous) = questions.insert(question.id(), question) {
                        tracing::warn!(
                            "Question {} appears more than once in {}, keeping the last",
                            previous.id(),
                            path.display()
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed question record {} in {}: {e}",
                        number + 1,
                        path.display()
                    );
                }
            }
        }

        let last_id = questions.keys().next_back().map_or(0, |id| id.get());
        let threads = ThreadIndex::build(questions.values());

        for (root, _) in threads.iter() {
            if !questions.contains_key(&root) {
                tracing::warn!("Thread {root} has replies but no root question");
            }
        }

        tracing::debug!(
            "Loaded {} questions in {} threads from {}",
            questions.len(),
            threads.len(),
            path.display()
        );

        Self {
            path,
            questions,
            threads,
            last_id,
        }
    }

    /// Writes every question to the file, in ascending id order, replacing
    /// its previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StorageUnavailable`] if the file cannot be
    /// written.
    pub fn save(&self) -> Result<(), StoreError> {
        lines::replace_lines(&self.path, self.questions.values().map(encode_question)).map_err(
            |source| StoreError::StorageUnavailable {
                path: self.path.clone(),
                source,
            },
        )?;
        tracing::debug!(
            "Saved {} questions to {}",
            self.questions.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Asks a new question and persists it.
    ///
    /// The question gets the next unused id. If `new.parent` is set it must
    /// name the root of an existing thread.
    ///
    /// # Errors
    ///
    /// Nothing is changed if the recipient is unknown
    /// ([`StoreError::UserNotFound`]), does not accept anonymous questions
    /// ([`StoreError::AnonymousNotAllowed`]), the parent is not a thread root
    /// ([`StoreError::InvalidParent`]), the text is invalid
    /// ([`StoreError::InvalidText`]), or the highest id is already taken
    /// ([`StoreError::IdsExhausted`]). If saving fails the question is kept in
    /// memory and [`StoreError::StorageUnavailable`] is returned.
    pub fn ask(
        &mut self,
        new: NewQuestion,
        users: &impl UserLookup,
    ) -> Result<Question, StoreError> {
        let recipient = users
            .lookup_user(new.to)
            .ok_or(StoreError::UserNotFound(new.to))?;
        if new.anonymous && !recipient.allows_anonymous {
            return Err(StoreError::AnonymousNotAllowed(new.to));
        }
        if let Some(parent) = new.parent {
            if !self.is_thread_root(parent) {
                return Err(StoreError::InvalidParent(parent));
            }
        }

        let id = self
            .last_id
            .checked_add(1)
            .map(QuestionId::new)
            .ok_or(StoreError::IdsExhausted)?;
        let question = Question::new(id, new)?;
        self.last_id = id.get();

        self.questions.insert(id, question.clone());
        self.reindex();
        self.save()?;

        tracing::info!("Question {id} asked in thread {}", question.thread());
        Ok(question)
    }

    /// Sets or overwrites the answer to a question and persists it.
    ///
    /// Callers are responsible for checking that the current user is the
    /// recipient, for example with [`Self::question_for_recipient`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no such question and
    /// [`StoreError::InvalidText`] if the answer cannot be stored. If saving
    /// fails the answer is kept in memory and
    /// [`StoreError::StorageUnavailable`] is returned.
    pub fn answer(&mut self, id: QuestionId, text: String) -> Result<AnswerOutcome, StoreError> {
        let answer = validate_text(text)?;
        let question = self
            .questions
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        let outcome = match question.set_answer(answer) {
            Some(previous) => {
                tracing::warn!("Overwriting existing answer to question {id}");
                AnswerOutcome::Overwritten {
                    previous: previous.as_str().to_string(),
                }
            }
            None => AnswerOutcome::Answered,
        };

        self.save()?;
        tracing::info!("Question {id} answered");
        Ok(outcome)
    }

    /// Deletes a question and persists the result.
    ///
    /// Deleting a thread root deletes the whole thread. Deleting a reply
    /// removes only that reply. Returns the ids that were removed, in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no such question. If
    /// saving fails the deletion is kept in memory and
    /// [`StoreError::StorageUnavailable`] is returned.
    pub fn delete(&mut self, id: QuestionId) -> Result<Vec<QuestionId>, StoreError> {
        if !self.questions.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }

        let removed = self.deletion_set(id);
        for member in &removed {
            self.questions.remove(member);
        }

        self.reindex();
        self.save()?;

        tracing::info!("Deleted {} question(s) starting from {id}", removed.len());
        Ok(removed)
    }

    /// The questions [`Self::delete`] would remove for `id`, in ascending
    /// order.
    ///
    /// This is the whole thread when `id` is a thread root, and `id` alone
    /// otherwise, including for a reply that other records name as their
    /// parent. Empty if there is no such question.
    #[must_use]
    pub fn deletion_set(&self, id: QuestionId) -> Vec<QuestionId> {
        if !self.questions.contains_key(&id) {
            return Vec::new();
        }
        let mut ids: Vec<QuestionId> = match self.threads.members(id) {
            Some(members) if self.is_thread_root(id) => members
                .iter()
                .copied()
                .filter(|member| self.questions.contains_key(member))
                .collect(),
            _ => vec![id],
        };
        ids.sort_unstable();
        ids
    }

    /// Fetches a question the given user is allowed to answer or delete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no such question, and
    /// [`StoreError::NotAddressedTo`] if it was asked of someone else.
    pub fn question_for_recipient(
        &self,
        id: QuestionId,
        user: UserId,
    ) -> Result<&Question, StoreError> {
        let question = self.question(id).ok_or(StoreError::NotFound(id))?;
        if question.recipient() == user {
            Ok(question)
        } else {
            Err(StoreError::NotAddressedTo { question: id, user })
        }
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(&id)
    }

    /// Iterates over all questions in ascending id order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    /// The number of stored questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the store holds no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The thread index over the stored questions.
    #[must_use]
    pub const fn threads(&self) -> &ThreadIndex {
        &self.threads
    }

    /// The file this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `id` is an existing question that starts a thread.
    #[must_use]
    pub fn is_thread_root(&self, id: QuestionId) -> bool {
        self.question(id).is_some_and(Question::is_thread_root)
    }

    /// The questions of a thread, root first.
    ///
    /// Returns `None` if `root` does not identify a thread.
    #[must_use]
    pub fn thread(&self, root: QuestionId) -> Option<Vec<&Question>> {
        let members = self.threads.members(root)?;
        Some(members.iter().filter_map(|id| self.question(*id)).collect())
    }

    /// Questions addressed to `user`, grouped by thread.
    ///
    /// Threads are ordered by root id and questions within a thread keep
    /// thread order, so a reply addressed to `user` appears under its root
    /// even if the root was asked of someone else.
    #[must_use]
    pub fn questions_to_user(&self, user: UserId) -> BTreeMap<QuestionId, Vec<QuestionId>> {
        let mut grouped: BTreeMap<QuestionId, Vec<QuestionId>> = BTreeMap::new();
        for (root, members) in self.threads.iter() {
            for id in members {
                if self
                    .question(*id)
                    .is_some_and(|question| question.recipient() == user)
                {
                    grouped.entry(root).or_default().push(*id);
                }
            }
        }
        grouped
    }

    /// Questions asked by `user`, in ascending id order.
    #[must_use]
    pub fn questions_from_user(&self, user: UserId) -> Vec<QuestionId> {
        self.questions
            .values()
            .filter(|question| question.author() == user)
            .map(Question::id)
            .collect()
    }

    /// Every answered question, in ascending id order.
    #[must_use]
    pub fn feed(&self) -> Vec<&Question> {
        self.questions
            .values()
            .filter(|question| question.is_answered())
            .collect()
    }

    fn reindex(&mut self) {
        self.threads = ThreadIndex::build(self.questions.values());
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::UserIdentity;

    /// Every user exists; user 9 refuses anonymous questions.
    struct Everyone;

    impl UserLookup for Everyone {
        fn lookup_user(&self, id: UserId) -> Option<UserIdentity> {
            (id.get() != 404).then_some(UserIdentity {
                id,
                allows_anonymous: id.get() != 9,
            })
        }
    }

    fn setup_temp_store() -> (TempDir, QuestionStore) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let path = tmp.path().join("questions.txt");
        (tmp, QuestionStore::load(path))
    }

    fn ask(
        store: &mut QuestionStore,
        from: u32,
        to: u32,
        parent: Option<u32>,
        text: &str,
    ) -> Result<Question, StoreError> {
        store.ask(
            NewQuestion {
                from: UserId::new(from),
                to: UserId::new(to),
                anonymous: false,
                parent: parent.map(QuestionId::new),
                text: text.to_string(),
            },
            &Everyone,
        )
    }

    fn ids(raw: &[u32]) -> Vec<QuestionId> {
        raw.iter().copied().map(QuestionId::new).collect()
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_tmp, store) = setup_temp_store();
        assert!(store.is_empty());
        assert!(store.threads().is_empty());
    }

    #[test]
    fn scenario_ask_answer_reply_delete() {
        let (tmp, mut store) = setup_temp_store();

        let first = ask(&mut store, 1, 2, None, "Hi?").unwrap();
        assert_eq!(first.id(), QuestionId::new(1));
        assert_eq!(first.parent(), None);
        assert_eq!(first.answer(), None);
        assert_eq!(store.len(), 1);

        store
            .answer(QuestionId::new(1), "Hello!".to_string())
            .unwrap();
        let feed = store.feed();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id(), QuestionId::new(1));
        assert_eq!(feed[0].answer(), Some("Hello!"));

        let reply = store
            .ask(
                NewQuestion {
                    from: UserId::new(3),
                    to: UserId::new(2),
                    anonymous: true,
                    parent: Some(QuestionId::new(1)),
                    text: "+1".to_string(),
                },
                &Everyone,
            )
            .unwrap();
        assert_eq!(reply.id(), QuestionId::new(2));
        assert_eq!(reply.parent(), Some(QuestionId::new(1)));

        let to_two = store.questions_to_user(UserId::new(2));
        assert_eq!(to_two, BTreeMap::from([(QuestionId::new(1), ids(&[1, 2]))]));

        let removed = store.delete(QuestionId::new(1)).unwrap();
        assert_eq!(removed, ids(&[1, 2]));

        let reloaded = QuestionStore::load(tmp.path().join("questions.txt"));
        assert!(reloaded.is_empty());
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (tmp, mut store) = setup_temp_store();
        let path = tmp.path().join("questions.txt");

        ask(&mut store, 1, 2, None, "Hi?").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1,-1,1,2,0,Hi?,\n");

        store.answer(QuestionId::new(1), "Yo".to_string()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1,-1,1,2,0,Hi?,Yo\n");

        ask(&mut store, 2, 1, Some(1), "And you?").unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1,-1,1,2,0,Hi?,Yo\n2,1,2,1,0,And you?,\n"
        );
    }

    #[test]
    fn load_rebuilds_threads_and_next_id() {
        let (tmp, _) = setup_temp_store();
        let path = tmp.path().join("questions.txt");
        fs::write(
            &path,
            "3,-1,1,2,0,root,\n\n7,3,2,1,0,reply,answer\n5,-1,4,4,1,other,\n",
        )
        .unwrap();

        let mut store = QuestionStore::load(path);
        assert_eq!(store.len(), 3);
        assert_eq!(store.threads().members(QuestionId::new(3)), Some(ids(&[3, 7]).as_slice()));
        assert_eq!(store.threads().members(QuestionId::new(5)), Some(ids(&[5]).as_slice()));

        let next = ask(&mut store, 1, 2, None, "new").unwrap();
        assert_eq!(next.id(), QuestionId::new(8));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (tmp, _) = setup_temp_store();
        let path = tmp.path().join("questions.txt");
        fs::write(
            &path,
            "1,-1,1,2,0,fine,\nnot a record\n2,-1,x,2,0,bad id,\n3,-1,1,2,0,also fine,\n",
        )
        .unwrap();

        let store = QuestionStore::load(path);
        let loaded: Vec<_> = store.questions().map(Question::id).collect();
        assert_eq!(loaded, ids(&[1, 3]));
    }

    #[test]
    fn save_orders_by_id() {
        let (tmp, _) = setup_temp_store();
        let path = tmp.path().join("questions.txt");
        fs::write(&path, "2,-1,1,2,0,second,\n1,-1,1,2,0,first,\n").unwrap();

        QuestionStore::load(path.clone()).save().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1,-1,1,2,0,first,\n2,-1,1,2,0,second,\n"
        );
    }

    #[test]
    fn ids_are_monotonic_and_not_reused_after_delete() {
        let (_tmp, mut store) = setup_temp_store();

        let a = ask(&mut store, 1, 2, None, "a").unwrap().id();
        let b = ask(&mut store, 1, 2, None, "b").unwrap().id();
        store.delete(b).unwrap();
        let c = ask(&mut store, 1, 2, None, "c").unwrap().id();

        assert_eq!(a, QuestionId::new(1));
        assert_eq!(b, QuestionId::new(2));
        assert_eq!(c, QuestionId::new(3));
    }

    #[test]
    fn ask_rejects_unknown_parent() {
        let (_tmp, mut store) = setup_temp_store();

        let error = ask(&mut store, 1, 2, Some(1), "orphan").unwrap_err();

        assert!(matches!(error, StoreError::InvalidParent(id) if id == QuestionId::new(1)));
        assert!(store.is_empty());
    }

    #[test]
    fn ask_rejects_reply_as_parent() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "root").unwrap();
        ask(&mut store, 2, 1, Some(1), "reply").unwrap();

        let error = ask(&mut store, 1, 2, Some(2), "nested").unwrap_err();

        assert!(matches!(error, StoreError::InvalidParent(id) if id == QuestionId::new(2)));
    }

    #[test]
    fn failed_ask_does_not_consume_an_id() {
        let (_tmp, mut store) = setup_temp_store();

        ask(&mut store, 1, 2, None, "bad,text").unwrap_err();
        let question = ask(&mut store, 1, 2, None, "good text").unwrap();

        assert_eq!(question.id(), QuestionId::new(1));
    }

    #[test]
    fn ask_validates_recipient() {
        let (_tmp, mut store) = setup_temp_store();

        let error = ask(&mut store, 1, 404, None, "anyone?").unwrap_err();
        assert!(matches!(error, StoreError::UserNotFound(id) if id == UserId::new(404)));

        let error = store
            .ask(
                NewQuestion {
                    from: UserId::new(1),
                    to: UserId::new(9),
                    anonymous: true,
                    parent: None,
                    text: "secret".to_string(),
                },
                &Everyone,
            )
            .unwrap_err();
        assert!(matches!(error, StoreError::AnonymousNotAllowed(id) if id == UserId::new(9)));
        assert!(store.is_empty());
    }

    #[test]
    fn ask_rejects_invalid_text() {
        let (_tmp, mut store) = setup_temp_store();

        let error = ask(&mut store, 1, 2, None, "").unwrap_err();
        assert!(matches!(error, StoreError::InvalidText(TextError::Empty)));

        let error = ask(&mut store, 1, 2, None, "a,b").unwrap_err();
        assert!(matches!(
            error,
            StoreError::InvalidText(TextError::ContainsDelimiter)
        ));
    }

    #[test]
    fn reanswering_overwrites_without_duplicating() {
        let (tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "Hi?").unwrap();
        let id = QuestionId::new(1);

        let first = store.answer(id, "x".to_string()).unwrap();
        let second = store.answer(id, "x".to_string()).unwrap();

        assert_eq!(first, AnswerOutcome::Answered);
        assert_eq!(
            second,
            AnswerOutcome::Overwritten {
                previous: "x".to_string()
            }
        );
        assert_eq!(store.question(id).unwrap().answer(), Some("x"));
        assert_eq!(store.len(), 1);

        let reloaded = QuestionStore::load(tmp.path().join("questions.txt"));
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.question(id).unwrap().answer(), Some("x"));
    }

    #[test]
    fn answer_unknown_question_is_not_found() {
        let (_tmp, mut store) = setup_temp_store();

        let error = store
            .answer(QuestionId::new(5), "hello".to_string())
            .unwrap_err();

        assert!(matches!(error, StoreError::NotFound(id) if id == QuestionId::new(5)));
    }

    #[test]
    fn deleting_reply_keeps_root_and_siblings() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "root").unwrap();
        ask(&mut store, 3, 2, Some(1), "reply a").unwrap();
        ask(&mut store, 4, 2, Some(1), "reply b").unwrap();

        let removed = store.delete(QuestionId::new(2)).unwrap();

        assert_eq!(removed, ids(&[2]));
        assert_eq!(store.threads().members(QuestionId::new(1)), Some(ids(&[1, 3]).as_slice()));
        assert!(store.question(QuestionId::new(1)).is_some());
        assert!(store.question(QuestionId::new(3)).is_some());
    }

    #[test]
    fn deleting_reply_named_as_parent_removes_only_that_reply() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("questions.txt");
        fs::write(
            &path,
            "1,-1,1,2,0,root,\n2,1,3,2,0,reply,\n3,2,4,2,0,nested,\n",
        )
        .unwrap();
        let mut store = QuestionStore::load(path.clone());
        assert_eq!(store.deletion_set(QuestionId::new(2)), ids(&[2]));

        let removed = store.delete(QuestionId::new(2)).unwrap();

        assert_eq!(removed, ids(&[2]));
        assert!(store.question(QuestionId::new(2)).is_none());
        assert!(store.question(QuestionId::new(1)).is_some());
        assert!(store.question(QuestionId::new(3)).is_some());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1,-1,1,2,0,root,\n3,2,4,2,0,nested,\n"
        );
    }

    #[test]
    fn deletion_set_matches_delete() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "root").unwrap();
        ask(&mut store, 3, 2, Some(1), "reply").unwrap();

        assert_eq!(store.deletion_set(QuestionId::new(1)), ids(&[1, 2]));
        assert_eq!(store.deletion_set(QuestionId::new(2)), ids(&[2]));
        assert!(store.deletion_set(QuestionId::new(9)).is_empty());

        assert_eq!(store.delete(QuestionId::new(1)).unwrap(), ids(&[1, 2]));
    }

    #[test]
    fn deleting_root_cascades_to_thread_only() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "first root").unwrap();
        ask(&mut store, 1, 2, None, "second root").unwrap();
        ask(&mut store, 3, 2, Some(1), "reply to first").unwrap();
        ask(&mut store, 3, 2, Some(2), "reply to second").unwrap();

        let removed = store.delete(QuestionId::new(1)).unwrap();

        assert_eq!(removed, ids(&[1, 3]));
        let remaining: Vec<_> = store.questions().map(Question::id).collect();
        assert_eq!(remaining, ids(&[2, 4]));
        assert!(!store.threads().contains(QuestionId::new(1)));
    }

    #[test]
    fn delete_unknown_question_is_not_found() {
        let (_tmp, mut store) = setup_temp_store();
        let error = store.delete(QuestionId::new(1)).unwrap_err();
        assert!(matches!(error, StoreError::NotFound(_)));
    }

    #[test]
    fn thread_index_matches_questions_after_mutations() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "a").unwrap();
        ask(&mut store, 1, 2, Some(1), "b").unwrap();
        ask(&mut store, 1, 2, None, "c").unwrap();
        ask(&mut store, 1, 2, Some(3), "d").unwrap();
        store.delete(QuestionId::new(2)).unwrap();

        for question in store.questions() {
            let members = store.threads().members(question.thread()).unwrap();
            assert_eq!(
                members.iter().filter(|id| **id == question.id()).count(),
                1
            );
        }
        assert_eq!(store.threads(), &ThreadIndex::build(store.questions()));
    }

    #[test]
    fn questions_to_user_groups_replies_under_root() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 5, None, "to someone else").unwrap();
        ask(&mut store, 1, 2, Some(1), "reply to me").unwrap();
        ask(&mut store, 3, 2, None, "direct to me").unwrap();

        let grouped = store.questions_to_user(UserId::new(2));

        assert_eq!(
            grouped,
            BTreeMap::from([
                (QuestionId::new(1), ids(&[2])),
                (QuestionId::new(3), ids(&[3])),
            ])
        );
        assert!(store.questions_to_user(UserId::new(7)).is_empty());
    }

    #[test]
    fn questions_from_user_is_flat_and_ordered() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "a").unwrap();
        ask(&mut store, 2, 1, None, "b").unwrap();
        ask(&mut store, 1, 3, Some(2), "c").unwrap();

        assert_eq!(store.questions_from_user(UserId::new(1)), ids(&[1, 3]));
        assert_eq!(store.questions_from_user(UserId::new(2)), ids(&[2]));
        assert!(store.questions_from_user(UserId::new(3)).is_empty());
    }

    #[test]
    fn feed_contains_only_answered_in_order() {
        let (_tmp, mut store) = setup_temp_store();
        assert!(store.feed().is_empty());

        ask(&mut store, 1, 2, None, "a").unwrap();
        ask(&mut store, 1, 2, None, "b").unwrap();
        ask(&mut store, 1, 2, None, "c").unwrap();
        assert!(store.feed().is_empty());

        store.answer(QuestionId::new(3), "yes".to_string()).unwrap();
        store.answer(QuestionId::new(1), "no".to_string()).unwrap();

        let feed: Vec<_> = store.feed().into_iter().map(Question::id).collect();
        assert_eq!(feed, ids(&[1, 3]));
    }

    #[test]
    fn question_for_recipient_checks_addressee() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "for two").unwrap();
        let id = QuestionId::new(1);

        assert!(store.question_for_recipient(id, UserId::new(2)).is_ok());
        assert!(matches!(
            store.question_for_recipient(id, UserId::new(1)),
            Err(StoreError::NotAddressedTo { .. })
        ));
        assert!(matches!(
            store.question_for_recipient(QuestionId::new(9), UserId::new(2)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn thread_lists_members_root_first() {
        let (_tmp, mut store) = setup_temp_store();
        ask(&mut store, 1, 2, None, "root").unwrap();
        ask(&mut store, 2, 1, Some(1), "reply").unwrap();

        let thread: Vec<_> = store
            .thread(QuestionId::new(1))
            .unwrap()
            .into_iter()
            .map(Question::text)
            .collect();

        assert_eq!(thread, vec!["root", "reply"]);
        assert!(store.thread(QuestionId::new(2)).is_none());
    }

    #[test]
    fn ask_reports_exhausted_ids() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("questions.txt");
        fs::write(&path, "4294967295,-1,1,2,0,big,\n").unwrap();
        let mut store = QuestionStore::load(path.clone());

        let error = ask(&mut store, 1, 2, None, "one more?").unwrap_err();

        assert!(matches!(error, StoreError::IdsExhausted));
        assert_eq!(store.len(), 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "4294967295,-1,1,2,0,big,\n"
        );
    }

    #[test]
    fn unreadable_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("questions.txt");
        // Exists, but cannot be read as lines.
        fs::create_dir(&path).unwrap();

        let store = QuestionStore::load(path);

        assert!(store.is_empty());
        assert!(store.threads().is_empty());
    }

    #[test]
    fn failed_save_reports_storage_unavailable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("questions.txt");
        // A directory in place of the staging file makes every save fail.
        fs::create_dir_all(tmp.path().join("questions.txt.tmp")).unwrap();
        let mut store = QuestionStore::load(path.clone());

        let error = ask(&mut store, 1, 2, None, "lost?").unwrap_err();

        assert!(matches!(error, StoreError::StorageUnavailable { .. }));
        assert_eq!(store.len(), 1);
        assert!(!path.exists());
    }
}
