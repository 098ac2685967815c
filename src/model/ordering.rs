//! Reaction evaluation order and cycle detection.

use std::collections::BTreeSet;

use indexmap::IndexSet;

/// Compute an evaluation order using Kahn's algorithm
///
/// `dependencies[i]` lists the nodes whose outputs node `i` reads. Ready
/// nodes are taken lowest index first, so independent reactions keep their
/// declaration order.
///
/// On failure returns the nodes that could not be scheduled.
pub(super) fn evaluation_order(dependencies: &[Vec<usize>]) -> Result<Vec<usize>, Vec<usize>> {
    let n = dependencies.len();
    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

    // Deduplicate so a reaction reading the same output twice counts once
    for (node, deps) in dependencies.iter().enumerate() {
        let mut seen: IndexSet<usize> = IndexSet::new();
        for &dep in deps {
            if seen.insert(dep) {
                in_degree[node] += 1;
                dependents[dep].push(node);
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(node) = ready.pop_first() {
        order.push(node);
        for &dependent in &dependents[node] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() != n {
        return Err((0..n).filter(|&i| in_degree[i] > 0).collect());
    }

    Ok(order)
}
