//! # Unigram / Bigram Counter
//!
//! Tokens are whitespace-delimited byte strings. The bigram stream is the
//! concatenation of every line, so the last token of one line and the first
//! token of the next form a bigram.
//!
//! Each token `t` appears as the left side of a bigram `count(t)` times,
//! except the corpus's last token (one fewer); symmetrically it appears as
//! the right side `count(t)` times, except the corpus's first token.

use std::io::BufRead;

use crate::{
    errors::WSResult,
    types::{CountType, TokenId, WSHashMap},
    vocab::{Vocab, io::fields},
};

/// Options for [`NgramCounter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NgramCounterOptions {
    /// Stop reading after the first line which brings the token count to this limit.
    pub limit: Option<usize>,
}

impl NgramCounterOptions {
    /// Create new options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token limit.
    pub fn with_limit(
        self,
        limit: Option<usize>,
    ) -> Self {
        Self { limit }
    }

    /// Initialize an empty [`NgramCounter`].
    pub fn init<C: CountType>(self) -> NgramCounter<C> {
        NgramCounter::new(self)
    }
}

/// Directional unigram / bigram counts over a token stream.
#[derive(Debug, Clone)]
pub struct NgramCounter<C: CountType> {
    options: NgramCounterOptions,

    vocab: Vocab,
    present: Vec<bool>,
    present_count: usize,

    unigrams: Vec<C>,

    /// `left -> right -> count`.
    right_ctx: Vec<WSHashMap<TokenId, C>>,

    /// `right -> left -> count`.
    left_ctx: Vec<WSHashMap<TokenId, C>>,

    first: Option<TokenId>,
    last: Option<TokenId>,

    data_size: u64,
}

impl<C: CountType> NgramCounter<C> {
    /// Create an empty counter.
    pub fn new(options: NgramCounterOptions) -> Self {
        Self {
            options,
            vocab: Vocab::default(),
            present: Vec::new(),
            present_count: 0,
            unigrams: Vec::new(),
            right_ctx: Vec::new(),
            left_ctx: Vec::new(),
            first: None,
            last: None,
            data_size: 0,
        }
    }

    /// The config options.
    pub fn options(&self) -> &NgramCounterOptions {
        &self.options
    }

    /// Has the configured token limit been reached?
    pub fn limit_reached(&self) -> bool {
        self.options
            .limit
            .is_some_and(|limit| self.data_size >= limit as u64)
    }

    fn intern(
        &mut self,
        token: &[u8],
    ) -> TokenId {
        let id = self.vocab.get_or_insert(token);
        if id == self.present.len() {
            self.present.push(false);
            self.unigrams.push(C::zero());
            self.right_ctx.push(Default::default());
            self.left_ctx.push(Default::default());
        }
        if !self.present[id] {
            self.present[id] = true;
            self.present_count += 1;
        }
        id
    }

    fn add_bigram(
        &mut self,
        left: TokenId,
        right: TokenId,
        count: C,
    ) {
        *self.right_ctx[left].entry(right).or_insert_with(C::zero) += count;
        *self.left_ctx[right].entry(left).or_insert_with(C::zero) += count;
    }

    /// Count the tokens of one line.
    ///
    /// Returns `false` once the token limit is reached; later lines are ignored.
    pub fn update_from_line(
        &mut self,
        line: &[u8],
    ) -> bool {
        if self.limit_reached() {
            return false;
        }

        for token in fields(line) {
            let id = self.intern(token);
            self.unigrams[id] += C::one();
            self.data_size += 1;

            match self.last {
                Some(prev) => self.add_bigram(prev, id, C::one()),
                None => self.first = Some(id),
            }
            self.last = Some(id);
        }

        !self.limit_reached()
    }

    /// Count every line from a sample iterator, honoring the limit.
    pub fn update_from_lines<I>(
        &mut self,
        lines: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for line in lines {
            if !self.update_from_line(line.as_ref()) {
                break;
            }
        }
    }

    /// Count every line from a [`BufRead`] stream, honoring the limit.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn update_from_reader<R: BufRead>(
        &mut self,
        reader: R,
    ) -> WSResult<()> {
        for line in reader.split(b'\n') {
            if !self.update_from_line(&line?) {
                break;
            }
        }
        log::info!(
            "counted {} tokens, {} types",
            self.data_size,
            self.present_count
        );
        Ok(())
    }

    /// Total number of tokens consumed.
    pub fn data_size(&self) -> u64 {
        self.data_size
    }

    /// Total bigram mass: `data_size - 1`, or `0` for an empty stream.
    pub fn bigram_mass(&self) -> u64 {
        self.data_size.saturating_sub(1)
    }

    /// Number of distinct tokens currently present.
    pub fn len(&self) -> usize {
        self.present_count
    }

    /// Are there no tokens?
    pub fn is_empty(&self) -> bool {
        self.present_count == 0
    }

    /// The id of a present token.
    pub fn lookup(
        &self,
        token: &[u8],
    ) -> Option<TokenId> {
        self.vocab.lookup(token).filter(|&id| self.present[id])
    }

    /// Is `id` a present token?
    pub fn is_present(
        &self,
        id: TokenId,
    ) -> bool {
        self.present.get(id).copied().unwrap_or(false)
    }

    /// The bytes of token `id`.
    ///
    /// ## Panics
    /// Panics if `id` was never assigned.
    pub fn token(
        &self,
        id: TokenId,
    ) -> &[u8] {
        self.vocab.token(id)
    }

    /// Present token ids, in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> + '_ {
        (0..self.present.len()).filter(|&id| self.present[id])
    }

    /// The first token of the stream.
    pub fn first_token(&self) -> Option<TokenId> {
        self.first
    }

    /// The last token of the stream.
    pub fn last_token(&self) -> Option<TokenId> {
        self.last
    }

    /// Occurrences of `id`; `0` when absent.
    pub fn unigram_count(
        &self,
        id: TokenId,
    ) -> C {
        self.unigrams.get(id).copied().unwrap_or_else(C::zero)
    }

    /// Occurrences of `id` as the left side of a bigram.
    pub fn left_count(
        &self,
        id: TokenId,
    ) -> C {
        let count = self.unigram_count(id);
        if self.last == Some(id) && count > C::zero() {
            count - C::one()
        } else {
            count
        }
    }

    /// Occurrences of `id` as the right side of a bigram.
    pub fn right_count(
        &self,
        id: TokenId,
    ) -> C {
        let count = self.unigram_count(id);
        if self.first == Some(id) && count > C::zero() {
            count - C::one()
        } else {
            count
        }
    }

    /// Count of the bigram `(left, right)`; `0` when unseen.
    pub fn bigram_count(
        &self,
        left: TokenId,
        right: TokenId,
    ) -> C {
        self.right_ctx
            .get(left)
            .and_then(|row| row.get(&right))
            .copied()
            .unwrap_or_else(C::zero)
    }

    /// `right -> count` for every bigram `(left, right)`.
    pub fn right_contexts(
        &self,
        left: TokenId,
    ) -> impl Iterator<Item = (TokenId, C)> + '_ {
        self.right_ctx
            .get(left)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&r, &c)| (r, c)))
    }

    /// `left -> count` for every bigram `(left, right)`.
    pub fn left_contexts(
        &self,
        right: TokenId,
    ) -> impl Iterator<Item = (TokenId, C)> + '_ {
        self.left_ctx
            .get(right)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&l, &c)| (l, c)))
    }

    /// Fold token `src` into `dest`.
    ///
    /// Every bigram touching `src` is re-keyed with `src` replaced by `dest`
    /// and summed into any existing entry; `(dest, src)`, `(src, dest)` and
    /// `(src, src)` all land on `(dest, dest)`. `src` is then absent.
    ///
    /// Runs in time proportional to the number of distinct contexts of `src`.
    ///
    /// ## Panics
    /// Panics unless `src` and `dest` are distinct present tokens.
    pub fn merge_tokens(
        &mut self,
        dest: TokenId,
        src: TokenId,
    ) {
        assert!(
            self.is_present(dest) && self.is_present(src) && dest != src,
            "merge_tokens({dest}, {src}): both tokens must be distinct and present"
        );

        let right_of_src = core::mem::take(&mut self.right_ctx[src]);
        let left_of_src = core::mem::take(&mut self.left_ctx[src]);

        let mut moved: Vec<(TokenId, TokenId, C)> =
            Vec::with_capacity(right_of_src.len() + left_of_src.len());

        for (&r, &c) in right_of_src.iter() {
            if r != src {
                self.left_ctx[r].remove(&src);
            }
            moved.push((src, r, c));
        }
        for (&l, &c) in left_of_src.iter() {
            // (src, src) was already taken from `right_of_src`.
            if l != src {
                self.right_ctx[l].remove(&src);
                moved.push((l, src, c));
            }
        }

        let remap = |t: TokenId| if t == src { dest } else { t };
        for (l, r, c) in moved {
            self.add_bigram(remap(l), remap(r), c);
        }

        let src_count = self.unigrams[src];
        self.unigrams[dest] += src_count;
        self.unigrams[src] = C::zero();

        self.present[src] = false;
        self.present_count -= 1;

        if self.first == Some(src) {
            self.first = Some(dest);
        }
        if self.last == Some(src) {
            self.last = Some(dest);
        }
    }

    /// `(token, count)` for every present token, in first-seen order.
    pub fn unigram_entries(&self) -> impl Iterator<Item = (&[u8], u64)> + '_ {
        self.ids()
            .map(|id| (self.token(id), self.unigram_count(id).to_u64().unwrap_or(0)))
    }

    /// `(left, right, count)` for every bigram, grouped by left token in first-seen order.
    ///
    /// Right contexts within a group are sorted by id, so output is stable.
    pub fn bigram_entries(&self) -> impl Iterator<Item = (&[u8], &[u8], u64)> + '_ {
        self.ids().flat_map(move |l| {
            let mut row: Vec<(TokenId, C)> = self.right_contexts(l).collect();
            row.sort_unstable_by_key(|&(r, _)| r);
            row.into_iter().map(move |(r, c)| {
                (self.token(l), self.token(r), c.to_u64().unwrap_or(0))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn counter(text: &str) -> NgramCounter<u32> {
        let mut counter = NgramCounterOptions::new().init::<u32>();
        counter.update_from_lines(text.lines());
        counter
    }

    fn id(
        counter: &NgramCounter<u32>,
        token: &str,
    ) -> TokenId {
        counter.lookup(token.as_bytes()).unwrap()
    }

    #[test]
    fn test_counts() {
        let c = counter("a b a\nc a");
        let (a, b, cc) = (id(&c, "a"), id(&c, "b"), id(&c, "c"));

        assert_eq!(c.data_size(), 5);
        assert_eq!(c.bigram_mass(), 4);
        assert_eq!(c.len(), 3);

        assert_eq!(c.unigram_count(a), 3);
        assert_eq!(c.bigram_count(a, b), 1);
        assert_eq!(c.bigram_count(b, a), 1);
        // across the line break.
        assert_eq!(c.bigram_count(a, cc), 1);
        assert_eq!(c.bigram_count(cc, a), 1);
        assert_eq!(c.bigram_count(b, cc), 0);

        // `a` is both first and last.
        assert_eq!(c.first_token(), Some(a));
        assert_eq!(c.last_token(), Some(a));
        assert_eq!(c.left_count(a), 2);
        assert_eq!(c.right_count(a), 2);
        assert_eq!(c.left_count(b), 1);
        assert_eq!(c.right_count(b), 1);

        // unseen ids are neutral.
        assert_eq!(c.unigram_count(99), 0);
        assert_eq!(c.bigram_count(99, a), 0);
        assert_eq!(c.lookup(b"zzz"), None);
    }

    #[test]
    fn test_empty() {
        let c = counter("");
        assert!(c.is_empty());
        assert_eq!(c.data_size(), 0);
        assert_eq!(c.bigram_mass(), 0);
        assert_eq!(c.first_token(), None);
        assert_eq!(c.unigram_entries().count(), 0);
    }

    #[test]
    fn test_limit() {
        let mut c = NgramCounterOptions::new()
            .with_limit(Some(3))
            .init::<u64>();
        c.update_from_reader(b"a b\nc d\ne f\n".as_slice()).unwrap();

        // the limit is checked at the end of each line.
        assert_eq!(c.data_size(), 4);
        assert!(c.limit_reached());
        assert_eq!(c.lookup(b"e"), None);
    }

    #[test]
    fn test_merge_tokens() {
        let mut c = counter("dog runs cat runs dog cat cat");
        let (dog, runs, cat) = (id(&c, "dog"), id(&c, "runs"), id(&c, "cat"));

        c.merge_tokens(dog, cat);

        assert_eq!(c.lookup(b"cat"), None);
        assert!(!c.is_present(cat));
        assert_eq!(c.len(), 2);
        assert_eq!(c.unigram_count(dog), 5);
        assert_eq!(c.unigram_count(cat), 0);

        // dog runs, cat runs.
        assert_eq!(c.bigram_count(dog, runs), 2);
        // runs cat, runs dog.
        assert_eq!(c.bigram_count(runs, dog), 2);
        // dog cat, cat cat.
        assert_eq!(c.bigram_count(dog, dog), 2);
        assert_eq!(c.bigram_count(cat, cat), 0);
        assert_eq!(c.left_contexts(cat).count(), 0);

        // `cat` was last.
        assert_eq!(c.last_token(), Some(dog));
        assert_eq!(c.left_count(dog), 4);
        assert_eq!(c.right_count(dog), 4);

        let mass: u64 = c.bigram_entries().map(|(_, _, n)| n).sum();
        assert_eq!(mass, c.bigram_mass());
    }

    #[test]
    fn test_entries() {
        let c = counter("a b a");
        let uni: Vec<_> = c.unigram_entries().collect();
        assert_eq!(uni, vec![(&b"a"[..], 2), (&b"b"[..], 1)]);

        let bi: Vec<_> = c.bigram_entries().collect();
        assert_eq!(bi, vec![(&b"a"[..], &b"b"[..], 1), (&b"b"[..], &b"a"[..], 1)]);
    }

    proptest! {
        #[test]
        fn prop_merge_tokens_sums_contexts(
            words in proptest::collection::vec(0_u8..6, 2..60),
            dest_pick in 0_usize..6,
            src_pick in 0_usize..6,
        ) {
            let text = words
                .iter()
                .map(|w| format!("w{w}"))
                .collect::<Vec<_>>()
                .join(" ");
            let mut c = counter(&text);

            let ids: Vec<TokenId> = c.ids().collect();
            prop_assume!(ids.len() >= 2);
            let dest = ids[dest_pick % ids.len()];
            let src = ids[src_pick % ids.len()];
            prop_assume!(dest != src);

            let before = c.clone();
            c.merge_tokens(dest, src);

            prop_assert!(!c.is_present(src));
            prop_assert_eq!(c.lookup(before.token(src)), None);

            for ctx in c.ids() {
                if ctx == dest {
                    continue;
                }
                prop_assert_eq!(
                    c.bigram_count(ctx, dest),
                    before.bigram_count(ctx, dest) + before.bigram_count(ctx, src)
                );
                prop_assert_eq!(
                    c.bigram_count(dest, ctx),
                    before.bigram_count(dest, ctx) + before.bigram_count(src, ctx)
                );
                prop_assert_eq!(c.bigram_count(ctx, src), 0);
            }

            prop_assert_eq!(
                c.bigram_count(dest, dest),
                before.bigram_count(dest, dest)
                    + before.bigram_count(dest, src)
                    + before.bigram_count(src, dest)
                    + before.bigram_count(src, src)
            );

            let mass: u64 = c.bigram_entries().map(|(_, _, n)| n).sum();
            prop_assert_eq!(mass, c.bigram_mass());
        }
    }
}
