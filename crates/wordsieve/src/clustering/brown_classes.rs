//! # Brown Class Engine
//!
//! [`BrownClasses`] keeps four views of the current clustering mutually
//! consistent:
//!
//! * the n-gram counts, with every class folded into its representative token;
//! * the [`MiTable`] of pointwise MI terms over those counts;
//! * the per-class cross sums, `Σ_b MI(a, b) + MI(b, a) - MI(a, a)`;
//! * a triangular table of the MI lost by merging each pair of classes.
//!
//! After any sequence of merges, every cached loss equals
//! [`BrownClasses::merge_loss_manual`] on the current counts, up to
//! floating point summation order.
//!
//! Classes are the tokens whose frequency reaches `min_freq`; rarer tokens
//! still take part in the statistics as contexts. Class slots are sorted by
//! their representative token's bytes, and keep their [`ClassId`] for life.

use core::mem;

use crate::{
    clustering::mutual_information::{MiTable, mi_term},
    concurrency::{par_for_each_mut, par_map_range, par_map_slice},
    counting::NgramCounter,
    types::{CountType, TokenId, WSHashMap, display_token},
};

/// Stable index of a class slot in a [`BrownClasses`] engine.
pub type ClassId = usize;

/// The best pair to merge next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCandidate {
    /// The surviving class; always `< right`.
    pub left: ClassId,

    /// The class absorbed into `left`.
    pub right: ClassId,

    /// The MI lost by the merge, in bits.
    pub loss: f64,
}

#[derive(Debug, Clone)]
struct ClassSlot {
    key: TokenId,
    members: Vec<TokenId>,
    alive: bool,
}

/// A token's bigram contexts and edge counts, as `f64`, frozen before a merge.
#[derive(Debug, Default)]
struct ContextSnapshot {
    /// `right -> count(token, right)`.
    right: WSHashMap<TokenId, f64>,

    /// `left -> count(left, token)`.
    left: WSHashMap<TokenId, f64>,

    left_count: f64,
    right_count: f64,
}

impl ContextSnapshot {
    fn capture<C: CountType>(
        counter: &NgramCounter<C>,
        id: TokenId,
    ) -> Self {
        Self {
            right: counter
                .right_contexts(id)
                .map(|(r, c)| (r, c.as_f64()))
                .collect(),
            left: counter
                .left_contexts(id)
                .map(|(l, c)| (l, c.as_f64()))
                .collect(),
            left_count: counter.left_count(id).as_f64(),
            right_count: counter.right_count(id).as_f64(),
        }
    }

    /// MI terms between this token and the union of tokens `x` and `y`, both directions.
    fn pair_terms(
        &self,
        x: TokenId,
        y: TokenId,
        xy_left: f64,
        xy_right: f64,
        mass: f64,
    ) -> f64 {
        let lookup = |map: &WSHashMap<TokenId, f64>, k: TokenId| map.get(&k).copied().unwrap_or(0.0);

        let to_xy = lookup(&self.right, x) + lookup(&self.right, y);
        let from_xy = lookup(&self.left, x) + lookup(&self.left, y);

        mi_term(to_xy, self.left_count, xy_right, mass)
            + mi_term(from_xy, xy_left, self.right_count, mass)
    }
}

/// The incremental Brown clustering state machine.
#[derive(Debug, Clone)]
pub struct BrownClasses<C: CountType> {
    counter: NgramCounter<C>,
    mass: f64,

    slots: Vec<ClassSlot>,
    slot_of_key: WSHashMap<TokenId, ClassId>,
    size: usize,

    mi: MiTable,
    cross_sums: Vec<f64>,

    /// `losses[i][j - i - 1]` for `i < j`.
    losses: Vec<Vec<f64>>,
}

impl<C: CountType> BrownClasses<C> {
    /// Build the initial state: one class per token with frequency `>= min_freq`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(counter)))]
    pub fn new(
        counter: NgramCounter<C>,
        min_freq: u64,
    ) -> Self {
        let mut keys: Vec<TokenId> = counter
            .ids()
            .filter(|&id| counter.unigram_count(id).to_u64().unwrap_or(0) >= min_freq)
            .collect();
        keys.sort_unstable_by(|&a, &b| counter.token(a).cmp(counter.token(b)));

        log::info!(
            "initializing {} classes from {} types (min_freq: {min_freq})",
            keys.len(),
            counter.len()
        );

        let slots: Vec<ClassSlot> = keys
            .iter()
            .map(|&key| ClassSlot {
                key,
                members: vec![key],
                alive: true,
            })
            .collect();
        let slot_of_key = keys
            .iter()
            .enumerate()
            .map(|(slot, &key)| (key, slot))
            .collect();

        let mut engine = Self {
            mass: counter.bigram_mass() as f64,
            mi: MiTable::from_counter(&counter),
            counter,
            size: slots.len(),
            slots,
            slot_of_key,
            cross_sums: Vec::new(),
            losses: Vec::new(),
        };

        log::debug!("initializing cross sums");
        engine.cross_sums = engine.compute_cross_sums();

        log::debug!("initializing loss table");
        let n = engine.slots.len();
        engine.losses = par_map_range(n, |i| {
            ((i + 1)..n)
                .map(|j| engine.merge_loss_manual(i, j))
                .collect()
        });

        engine
    }

    /// The current n-gram counts, with merged tokens folded together.
    pub fn counter(&self) -> &NgramCounter<C> {
        &self.counter
    }

    /// Number of live classes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total mutual information of the current bigram distribution.
    pub fn mutual_information(&self) -> f64 {
        self.mi.total()
    }

    /// Is `id` a live class?
    pub fn is_alive(
        &self,
        id: ClassId,
    ) -> bool {
        self.slots.get(id).is_some_and(|slot| slot.alive)
    }

    /// Live class ids, in key order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.slots.len()).filter(|&id| self.slots[id].alive)
    }

    /// The live class whose representative token is `key`.
    pub fn class_id(
        &self,
        key: &[u8],
    ) -> Option<ClassId> {
        self.counter
            .lookup(key)
            .and_then(|token| self.slot_of_key.get(&token).copied())
            .filter(|&id| self.slots[id].alive)
    }

    /// The representative token of class `id`.
    pub fn class_key(
        &self,
        id: ClassId,
    ) -> &[u8] {
        self.counter.token(self.slots[id].key)
    }

    /// The words merged into class `id`, in merge order.
    pub fn members(
        &self,
        id: ClassId,
    ) -> impl Iterator<Item = &[u8]> + '_ {
        self.live_slot(id)
            .members
            .iter()
            .map(move |&t| self.counter.token(t))
    }

    /// Member lists of every live class, in key order.
    pub fn classes(&self) -> impl Iterator<Item = Vec<&[u8]>> + '_ {
        self.class_ids().map(move |id| self.members(id).collect())
    }

    /// The cached cross sum of class `id`.
    pub fn cross_sum(
        &self,
        id: ClassId,
    ) -> f64 {
        self.live_slot(id);
        self.cross_sums[id]
    }

    fn live_slot(
        &self,
        id: ClassId,
    ) -> &ClassSlot {
        match self.slots.get(id) {
            Some(slot) if slot.alive => slot,
            _ => panic!("class {id} is not a live class"),
        }
    }

    fn token_cross_sum(
        &self,
        token: TokenId,
    ) -> f64 {
        let outgoing: f64 = self.mi.row(token).map(|(_, v)| v).sum();
        let incoming: f64 = self
            .counter
            .left_contexts(token)
            .map(|(l, _)| self.mi.get(l, token))
            .sum();
        outgoing + incoming - self.mi.get(token, token)
    }

    fn compute_cross_sums(&self) -> Vec<f64> {
        par_map_range(self.slots.len(), |id| {
            let slot = &self.slots[id];
            if slot.alive {
                self.token_cross_sum(slot.key)
            } else {
                0.0
            }
        })
    }

    /// The cached loss of merging `a` and `b`.
    ///
    /// ## Panics
    /// Panics unless `a` and `b` are distinct live classes.
    pub fn merge_loss(
        &self,
        a: ClassId,
        b: ClassId,
    ) -> f64 {
        assert_ne!(a, b, "a class cannot merge with itself");
        self.live_slot(a);
        self.live_slot(b);
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        self.losses[i][j - i - 1]
    }

    /// The loss of merging `a` and `b`, computed directly from the current counts.
    ///
    /// This is the MI the two classes carry (their cross sums, less the terms
    /// between them, which both cross sums count), minus the MI the merged
    /// class would carry with every other token and with itself.
    ///
    /// ## Panics
    /// Panics unless `a` and `b` are distinct live classes.
    pub fn merge_loss_manual(
        &self,
        a: ClassId,
        b: ClassId,
    ) -> f64 {
        assert_ne!(a, b, "a class cannot merge with itself");
        let ta = self.live_slot(a).key;
        let tb = self.live_slot(b).key;
        let counter = &self.counter;
        let mass = self.mass;

        let initial = self.cross_sums[a] + self.cross_sums[b]
            - self.mi.get(ta, tb)
            - self.mi.get(tb, ta);

        let ab_left = counter.left_count(ta).as_f64() + counter.left_count(tb).as_f64();
        let ab_right = counter.right_count(ta).as_f64() + counter.right_count(tb).as_f64();

        let mut into_ab: WSHashMap<TokenId, f64> = Default::default();
        for (l, c) in counter.left_contexts(ta).chain(counter.left_contexts(tb)) {
            if l != ta && l != tb {
                *into_ab.entry(l).or_insert(0.0) += c.as_f64();
            }
        }
        let mut from_ab: WSHashMap<TokenId, f64> = Default::default();
        for (r, c) in counter.right_contexts(ta).chain(counter.right_contexts(tb)) {
            if r != ta && r != tb {
                *from_ab.entry(r).or_insert(0.0) += c.as_f64();
            }
        }

        let mut merged = 0.0;
        for (l, c) in into_ab {
            merged += mi_term(c, counter.left_count(l).as_f64(), ab_right, mass);
        }
        for (r, c) in from_ab {
            merged += mi_term(c, ab_left, counter.right_count(r).as_f64(), mass);
        }

        let inner = [(ta, ta), (ta, tb), (tb, ta), (tb, tb)]
            .iter()
            .map(|&(l, r)| counter.bigram_count(l, r).as_f64())
            .sum::<f64>();
        merged += mi_term(inner, ab_left, ab_right, mass);

        initial - merged
    }

    /// The live pair with the strictly smallest cached loss.
    ///
    /// Ties resolve to the pair whose `(left, right)` keys sort first.
    /// Returns `None` with fewer than two classes.
    pub fn find_best_merge(&self) -> Option<MergeCandidate> {
        let alive: Vec<ClassId> = self.class_ids().collect();

        let row_best: Vec<Option<(ClassId, f64)>> = par_map_slice(&alive, |&i| {
            let mut best: Option<(ClassId, f64)> = None;
            for (offset, &loss) in self.losses[i].iter().enumerate() {
                let j = i + 1 + offset;
                if !self.slots[j].alive {
                    continue;
                }
                if best.is_none_or(|(_, b)| loss < b) {
                    best = Some((j, loss));
                }
            }
            best
        });

        let mut best: Option<MergeCandidate> = None;
        for (&left, row) in alive.iter().zip(row_best) {
            if let Some((right, loss)) = row
                && best.is_none_or(|b| loss < b.loss)
            {
                best = Some(MergeCandidate { left, right, loss });
            }
        }
        best
    }

    /// Merge class `b` into class `a`.
    ///
    /// `b`'s words move to the end of `a`'s list and `b` dies; the counts
    /// fold together, the MI terms and cross sums are recomputed, every
    /// surviving pair's loss is updated in place, and `a`'s row is
    /// recomputed directly.
    ///
    /// ## Panics
    /// Panics unless `a` and `b` are distinct live classes.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn merge_classes(
        &mut self,
        a: ClassId,
        b: ClassId,
    ) {
        assert_ne!(a, b, "a class cannot merge with itself");
        let ta = self.live_slot(a).key;
        let tb = self.live_slot(b).key;

        log::debug!(
            "merging {:?} <- {:?}",
            display_token(self.counter.token(ta)),
            display_token(self.counter.token(tb))
        );

        let old_a = ContextSnapshot::capture(&self.counter, ta);
        let old_b = ContextSnapshot::capture(&self.counter, tb);

        let moved = mem::take(&mut self.slots[b].members);
        self.slots[a].members.extend(moved);
        self.slots[b].alive = false;
        self.losses[b] = Vec::new();
        self.size -= 1;

        self.counter.merge_tokens(ta, tb);
        self.mi = MiTable::from_counter(&self.counter);

        let new_cross_sums = self.compute_cross_sums();
        let old_cross_sums = mem::replace(&mut self.cross_sums, new_cross_sums);

        let new_a = ContextSnapshot::capture(&self.counter, ta);

        // Pairs not touching `a` change only through their cross sums and
        // their MI with the merged class, which replaces old `a` and `b`.
        let slots = &self.slots;
        let counter = &self.counter;
        let cross_sums = &self.cross_sums;
        let mass = self.mass;
        par_for_each_mut(&mut self.losses, |x, row| {
            if x == a || !slots[x].alive {
                return;
            }
            let kx = slots[x].key;
            let dx = cross_sums[x] - old_cross_sums[x];
            let (lx, rx) = (
                counter.left_count(kx).as_f64(),
                counter.right_count(kx).as_f64(),
            );

            for (offset, loss) in row.iter_mut().enumerate() {
                let y = x + 1 + offset;
                if y == a || !slots[y].alive {
                    continue;
                }
                let ky = slots[y].key;
                let dy = cross_sums[y] - old_cross_sums[y];
                let xy_left = lx + counter.left_count(ky).as_f64();
                let xy_right = rx + counter.right_count(ky).as_f64();

                *loss += dx + dy
                    + old_a.pair_terms(kx, ky, xy_left, xy_right, mass)
                    + old_b.pair_terms(kx, ky, xy_left, xy_right, mass)
                    - new_a.pair_terms(kx, ky, xy_left, xy_right, mass);
            }
        });

        let others: Vec<ClassId> = self.class_ids().filter(|&id| id != a).collect();
        let fresh = par_map_slice(&others, |&j| self.merge_loss_manual(a, j));
        for (&j, loss) in others.iter().zip(fresh) {
            let (i, k) = if a < j { (a, j) } else { (j, a) };
            self.losses[i][k - i - 1] = loss;
        }
    }
}
