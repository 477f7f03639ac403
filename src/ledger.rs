//! Blockchain ledger: transfer edges between fixed nodes and a feed of
//! human-readable transaction records.
//!
//! Per tick:
//! 1. With probability 0.3 (`u > 0.7`) append a transfer edge between two
//!    distinct ledger nodes. The edge list keeps the most recent entries and
//!    evicts the oldest first.
//! 2. Independently, with probability 0.5, synthesise a [`TransactionRecord`]
//!    and prepend it to the record feed (newest first, oldest truncated).
//!
//! Records are always written with [`TransactionStatus::Success`]; the other
//! statuses exist in the model but the update rule never produces them.

use std::collections::VecDeque;

use serde::Serialize;

use crate::geometry::{Segment, Vec3};
use crate::random::{base36_token, distinct_pair, random_index, RandomSource};

/// Default cap for both the edge list and the record feed.
pub const DEFAULT_CAPACITY: usize = 20;

const EDGE_THRESHOLD: f64 = 0.7;
const RECORD_THRESHOLD: f64 = 0.5;
const HASH_LEN: usize = 11;
const PEER_COUNT: usize = 10;
const MAX_AMOUNT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerNode {
    pub label: String,
    pub position: Vec3,
}

/// The three fixed ledger nodes.
pub fn seed_nodes() -> Vec<LedgerNode> {
    [
        ("Block A", [0.0, 0.0, 30.0]),
        ("Block B", [5.0, 0.0, 30.0]),
        ("Block C", [-5.0, 0.0, 30.0]),
    ]
    .into_iter()
    .map(|(label, position)| LedgerNode {
        label: label.to_string(),
        position,
    })
    .collect()
}

/// A → B, B → C, C → A.
pub fn seed_edges(nodes: &[LedgerNode]) -> Vec<Segment> {
    let n = nodes.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| Segment::new(nodes[i].position, nodes[(i + 1) % n].position))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Failure,
    Pending,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Failure => "failure",
            TransactionStatus::Pending => "pending",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Rounded to two decimals, in `[0, 10)`.
    pub amount: f64,
    pub status: TransactionStatus,
}

impl TransactionRecord {
    fn synthesize<R: RandomSource + ?Sized>(src: &mut R) -> Self {
        let hash = base36_token(src, HASH_LEN);
        let from = peer_label(random_index(src.uniform(), PEER_COUNT));
        let to = peer_label(random_index(src.uniform(), PEER_COUNT));
        let amount = (src.uniform() * MAX_AMOUNT * 100.0).round() / 100.0;
        Self {
            hash,
            from,
            to,
            amount,
            status: TransactionStatus::Success,
        }
    }

    pub fn involves(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }
}

fn peer_label(i: usize) -> String {
    format!("Node_{}", i)
}

#[derive(Debug, Clone)]
pub struct LedgerSimulator {
    nodes: Vec<LedgerNode>,
    edges: VecDeque<Segment>,
    records: VecDeque<TransactionRecord>,
    edge_capacity: usize,
    record_capacity: usize,
}

impl LedgerSimulator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(edge_capacity: usize, record_capacity: usize) -> Self {
        let nodes = seed_nodes();
        let mut edges: VecDeque<Segment> = seed_edges(&nodes).into();
        edges.truncate(edge_capacity);
        Self {
            nodes,
            edges,
            records: VecDeque::with_capacity(record_capacity),
            edge_capacity,
            record_capacity,
        }
    }

    pub fn update<R: RandomSource + ?Sized>(&mut self, src: &mut R) {
        if src.uniform() > EDGE_THRESHOLD {
            if let Some((from, to)) = distinct_pair(src, self.nodes.len()) {
                self.edges.push_back(Segment::new(
                    self.nodes[from].position,
                    self.nodes[to].position,
                ));
                while self.edges.len() > self.edge_capacity {
                    self.edges.pop_front();
                }
            }
        }

        if src.uniform() > RECORD_THRESHOLD {
            let record = TransactionRecord::synthesize(src);
            log::trace!("ledger record {} {} -> {}", record.hash, record.from, record.to);
            self.records.push_front(record);
            self.records.truncate(self.record_capacity);
        }
    }

    /// Restore the seed edges and clear the record feed.
    pub fn reset(&mut self) {
        self.edges = seed_edges(&self.nodes).into();
        self.edges.truncate(self.edge_capacity);
        self.records.clear();
    }

    pub fn nodes(&self) -> &[LedgerNode] {
        &self.nodes
    }

    /// Oldest first.
    pub fn edges(&self) -> impl Iterator<Item = &Segment> {
        self.edges.iter()
    }

    /// Newest first.
    pub fn records(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl Default for LedgerSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Directed link in the transaction graph, one per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: f64,
    pub hash: String,
}

/// Peer-to-peer view of the record feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionGraph {
    /// Unique peer ids in first-seen order.
    pub nodes: Vec<String>,
    pub links: Vec<GraphLink>,
}

impl TransactionGraph {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut graph = TransactionGraph::default();
        for r in records {
            for id in [&r.from, &r.to] {
                if !graph.nodes.iter().any(|n| n == id) {
                    graph.nodes.push(id.clone());
                }
            }
            graph.links.push(GraphLink {
                source: r.from.clone(),
                target: r.to.clone(),
                value: r.amount,
                hash: r.hash.clone(),
            });
        }
        graph
    }

    /// Sum of amounts sent and received by `node_id`.
    pub fn volume_of(&self, node_id: &str) -> f64 {
        self.links
            .iter()
            .filter(|l| l.source == node_id || l.target == node_id)
            .map(|l| l.value)
            .sum()
    }
}

/// Newest record sent or received by `node_id`, given a newest-first feed.
pub fn latest_involving<'a, I>(records: I, node_id: &str) -> Option<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    records.into_iter().find(|r| r.involves(node_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSource, SeededSource, SequenceSource};

    #[test]
    fn starts_with_seed_edges_and_no_records() {
        let ledger = LedgerSimulator::new();
        assert_eq!(ledger.nodes().len(), 3);
        let edges: Vec<&Segment> = ledger.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(*edges[0], Segment::new([0.0, 0.0, 30.0], [5.0, 0.0, 30.0]));
        assert_eq!(*edges[1], Segment::new([5.0, 0.0, 30.0], [-5.0, 0.0, 30.0]));
        assert_eq!(*edges[2], Segment::new([-5.0, 0.0, 30.0], [0.0, 0.0, 30.0]));
        assert_eq!(ledger.record_count(), 0);
    }

    #[test]
    fn fixed_draw_writes_record_but_no_edge() {
        let mut ledger = LedgerSimulator::new();
        ledger.update(&mut FixedSource::new(0.6));
        assert_eq!(ledger.edge_count(), 3);
        let record = ledger.records().next().unwrap();
        assert_eq!(record.hash, "lllllllllll");
        assert_eq!(record.from, "Node_6");
        assert_eq!(record.to, "Node_6");
        assert_eq!(record.amount, 6.0);
        assert_eq!(record.status, TransactionStatus::Success);
    }

    #[test]
    fn edge_connects_distinct_nodes() {
        let mut ledger = LedgerSimulator::new();
        // edge gate, from = 0, to slot 0 -> shifted to 1, record gate closed
        ledger.update(&mut SequenceSource::new(vec![0.8, 0.1, 0.1, 0.2]));
        let last = *ledger.edges().last().unwrap();
        assert_eq!(last, Segment::new([0.0, 0.0, 30.0], [5.0, 0.0, 30.0]));
        assert_eq!(ledger.edge_count(), 4);
        assert_eq!(ledger.record_count(), 0);
    }

    #[test]
    fn edges_evict_oldest_first() {
        let mut ledger = LedgerSimulator::with_capacity(5, 5);
        // from = Block C, to = Block A; record gate closed
        let mut src = SequenceSource::new(vec![0.9, 0.9, 0.1, 0.0]);
        for _ in 0..4 {
            ledger.update(&mut src);
        }
        assert_eq!(ledger.edge_count(), 5);
        let edges: Vec<&Segment> = ledger.edges().collect();
        // two seed edges evicted, C → A seed edge is now first
        assert_eq!(*edges[0], Segment::new([-5.0, 0.0, 30.0], [0.0, 0.0, 30.0]));
    }

    #[test]
    fn caps_hold_under_random_updates() {
        let mut ledger = LedgerSimulator::new();
        let mut rng = SeededSource::from_seed(21);
        for _ in 0..1_000 {
            ledger.update(&mut rng);
            assert!(ledger.edge_count() <= DEFAULT_CAPACITY);
            assert!(ledger.record_count() <= DEFAULT_CAPACITY);
        }
        for r in ledger.records() {
            assert!(r.amount >= 0.0 && r.amount <= 10.0);
            assert_eq!(r.status, TransactionStatus::Success);
            assert!(r.from.starts_with("Node_"));
        }
    }

    #[test]
    fn records_are_newest_first() {
        let mut ledger = LedgerSimulator::new();
        // edge gate closed, record gate open, 11 hash draws, from, to, amount
        let mut first = vec![0.0, 0.9];
        first.extend(std::iter::repeat(0.0).take(11));
        first.extend([0.1, 0.2, 0.5]);
        ledger.update(&mut SequenceSource::new(first));
        ledger.update(&mut FixedSource::new(0.6));
        let records: Vec<&TransactionRecord> = ledger.records().collect();
        assert_eq!(records[0].from, "Node_6");
        assert_eq!(records[1].hash, "00000000000");
        assert_eq!(records[1].from, "Node_1");
        assert_eq!(records[1].to, "Node_2");
        assert_eq!(records[1].amount, 5.0);
    }

    #[test]
    fn reset_restores_seed_state() {
        let mut ledger = LedgerSimulator::new();
        let mut rng = SeededSource::from_seed(2);
        for _ in 0..50 {
            ledger.update(&mut rng);
        }
        ledger.reset();
        let edges: Vec<Segment> = ledger.edges().copied().collect();
        assert_eq!(edges, seed_edges(&seed_nodes()));
        assert_eq!(ledger.record_count(), 0);
    }

    fn record(hash: &str, from: &str, to: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            hash: hash.into(),
            from: from.into(),
            to: to.into(),
            amount,
            status: TransactionStatus::Success,
        }
    }

    #[test]
    fn graph_collects_unique_peers() {
        let feed = vec![
            record("c", "Node_1", "Node_2", 1.5),
            record("b", "Node_2", "Node_3", 2.0),
            record("a", "Node_1", "Node_1", 0.5),
        ];
        let graph = TransactionGraph::from_records(&feed);
        assert_eq!(graph.nodes, vec!["Node_1", "Node_2", "Node_3"]);
        assert_eq!(graph.links.len(), 3);
        assert!((graph.volume_of("Node_2") - 3.5).abs() < 1e-12);

        assert_eq!(latest_involving(&feed, "Node_2").unwrap().hash, "c");
        assert_eq!(latest_involving(&feed, "Node_3").unwrap().hash, "b");
        assert!(latest_involving(&feed, "Node_9").is_none());
    }
}
