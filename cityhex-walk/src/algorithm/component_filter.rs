use crate::{graph::WalkNodeId, WalkError};
use kdam::tqdm;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashSet},
};

/// selects which connected components of a walk graph survive construction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ComponentFilter {
    Largest,
    TopK {
        k: usize,
    },
    #[default]
    KeepAll,
}

impl std::fmt::Display for ComponentFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentFilter::Largest => write!(f, "largest"),
            ComponentFilter::TopK { k } => write!(f, "top-{}", k),
            ComponentFilter::KeepAll => write!(f, "keep all"),
        }
    }
}

impl ComponentFilter {
    pub fn validate(&self) -> Result<(), WalkError> {
        match self {
            ComponentFilter::TopK { k } if *k == 0 => Err(WalkError::ConfigurationError(
                String::from("top_k component filter requires k >= 1"),
            )),
            _ => Ok(()),
        }
    }

    /// filters the connected node components, keeping the largest ones. ties
    /// on size keep the component listed first.
    pub fn assign_components(&self, components: Vec<Vec<WalkNodeId>>) -> Vec<Vec<WalkNodeId>> {
        use ComponentFilter as CF;
        let k = match self {
            CF::Largest => 1,
            CF::TopK { k } => *k,
            CF::KeepAll => return components,
        };
        if components.len() <= k {
            return components;
        }
        let mut heap: BinaryHeap<FilterQueueElement> = BinaryHeap::with_capacity(k + 1);
        let iter = tqdm!(
            components.iter().enumerate(),
            desc = format!("assign components using '{}' component filter", self),
            total = components.len()
        );

        for (idx, c) in iter {
            heap.push(FilterQueueElement::largest(c, idx));
            if heap.len() > k {
                let _ = heap.pop();
            }
        }
        eprintln!();
        let keep_indices: HashSet<usize> = heap.iter().map(|fqe| fqe.index).collect();

        components
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| keep_indices.contains(idx))
            .map(|(_, component)| component)
            .collect()
    }
}

#[derive(Clone, Eq, PartialEq)]
struct FilterQueueElement {
    size: usize,
    index: usize,
}

impl FilterQueueElement {
    /// the max-heap pops the smallest, latest-listed component first.
    pub fn largest(component: &[WalkNodeId], index: usize) -> FilterQueueElement {
        FilterQueueElement {
            size: component.len(),
            index,
        }
    }
}

impl Ord for FilterQueueElement {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .size
            .cmp(&self.size)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for FilterQueueElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(ids: &[usize]) -> Vec<WalkNodeId> {
        ids.iter().map(|i| WalkNodeId(*i)).collect()
    }

    #[test]
    fn test_largest() {
        let components = vec![component(&[0, 1]), component(&[2, 3, 4]), component(&[5])];
        let result = ComponentFilter::Largest.assign_components(components);
        assert_eq!(result, vec![component(&[2, 3, 4])]);
    }

    #[test]
    fn test_top_k_tie_keeps_first_listed() {
        let components = vec![component(&[0, 1]), component(&[2]), component(&[3, 4])];
        let result = ComponentFilter::TopK { k: 1 }.assign_components(components);
        assert_eq!(result, vec![component(&[0, 1])]);
    }

    #[test]
    fn test_keep_all() {
        let components = vec![component(&[0]), component(&[1])];
        let result = ComponentFilter::KeepAll.assign_components(components.clone());
        assert_eq!(result, components);
    }
}
