//! Id-keyed arena holding the live node set.
//!
//! Every subsystem reaches nodes through this store, so the tick loop, the
//! drag controller and the renderer always see the same state.

use std::collections::HashMap;

use super::error::CanvasError;
use super::node::Node;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
	pub kept: usize,
	pub added: usize,
	pub removed: usize,
	/// Ids that appeared more than once in the incoming list; only the first
	/// occurrence was kept.
	pub duplicates: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct NodeStore {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
}

impl NodeStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn get(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.index.get(id).map(|&i| &mut self.nodes[i])
	}

	/// Nodes in insertion order, which is also paint order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub fn iter(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	pub fn insert(&mut self, node: Node) -> Result<(), CanvasError> {
		if self.index.contains_key(&node.id) {
			return Err(CanvasError::DuplicateId(node.id));
		}
		self.index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
		Ok(())
	}

	pub fn remove(&mut self, id: &str) -> Option<Node> {
		let idx = self.index.remove(id)?;
		let node = self.nodes.remove(idx);
		self.reindex();
		Some(node)
	}

	/// Replaces the node set. Nodes whose id survives keep their position,
	/// velocity, fixed position and drag flag; everything else comes from
	/// `incoming`.
	pub fn reconcile(&mut self, incoming: Vec<Node>) -> ReconcileSummary {
		let mut summary = ReconcileSummary::default();
		let mut previous: HashMap<String, Node> = self
			.nodes
			.drain(..)
			.map(|node| (node.id.clone(), node))
			.collect();
		self.index.clear();

		for node in incoming {
			let id = node.id.clone();
			if self.insert(node).is_err() {
				summary.duplicates.push(id);
				continue;
			}
			let (Some(old), Some(node)) = (previous.remove(&id), self.nodes.last_mut()) else {
				summary.added += 1;
				continue;
			};
			node.x = old.x;
			node.y = old.y;
			node.vx = old.vx;
			node.vy = old.vy;
			node.fx = old.fx;
			node.fy = old.fy;
			node.dragging = old.dragging;
			summary.kept += 1;
		}
		summary.removed = previous.len();
		summary
	}

	fn reindex(&mut self) {
		self.index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.clone(), i))
			.collect();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::bubble_canvas::config::LayoutConfig;
	use crate::components::bubble_canvas::node::tests::album;

	fn node(id: &str, at: (f64, f64)) -> Node {
		Node::from_item(&album(id, 100.0, Some(at)), &LayoutConfig::default()).unwrap()
	}

	#[test]
	fn insert_rejects_duplicate_ids() {
		let mut store = NodeStore::new();
		store.insert(node("a", (1.0, 1.0))).unwrap();
		assert!(matches!(
			store.insert(node("a", (2.0, 2.0))),
			Err(CanvasError::DuplicateId(_))
		));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn remove_keeps_lookup_consistent() {
		let mut store = NodeStore::new();
		for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
			store.insert(node(id, (i as f64, 0.0))).unwrap();
		}
		assert!(store.remove("a").is_some());
		assert!(store.remove("a").is_none());
		assert_eq!(store.get("c").map(|n| n.x), Some(2.0));
		assert_eq!(store.get("b").map(|n| n.x), Some(1.0));
	}

	#[test]
	fn reconcile_carries_state_by_id() {
		let mut store = NodeStore::new();
		store.insert(node("a", (10.0, 20.0))).unwrap();
		store.insert(node("b", (30.0, 40.0))).unwrap();
		if let Some(b) = store.get_mut("b") {
			b.vx = 3.0;
		}

		let summary = store.reconcile(vec![
			node("b", (999.0, 999.0)),
			node("c", (5.0, 5.0)),
			node("c", (6.0, 6.0)),
		]);

		assert_eq!(summary.kept, 1);
		assert_eq!(summary.added, 1);
		assert_eq!(summary.removed, 1);
		assert_eq!(summary.duplicates, vec!["c".to_string()]);
		let b = store.get("b").unwrap();
		assert_eq!((b.x, b.y, b.vx), (30.0, 40.0, 3.0));
		assert_eq!(store.get("c").map(|n| n.x), Some(5.0));
		assert!(store.get("a").is_none());
	}
}
