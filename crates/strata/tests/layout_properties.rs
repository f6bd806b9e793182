//! Invariants of leveling and layout over random DAGs.

use std::collections::BTreeSet;

use proptest::prelude::*;

use strata::{
    PipelineDiagram, StrataError,
    config::AppConfig,
    semantic::{Node, Pipeline},
};

const GAP_X: f32 = 20.0;
const GAP_Y: f32 = 10.0;

/// Node names of varying length plus edges that only point from a lower
/// to a higher index, so the graph is acyclic.
fn dags() -> impl Strategy<Value = (Vec<String>, Vec<(usize, usize)>)> {
    (1usize..12).prop_flat_map(|n| {
        let names = prop::collection::btree_set("[a-z]{1,8}", n..=n)
            .prop_map(|names| names.into_iter().collect::<Vec<_>>());
        let edges = prop::collection::vec((0..n, 0..n), 0..24).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect::<Vec<_>>()
        });
        (names, edges)
    })
}

fn pipeline(names: &[String], edges: &[(usize, usize)]) -> Pipeline {
    edges.iter().fold(
        Pipeline::new("random", names.iter().map(Node::new).collect(), Default::default()),
        |pipeline, &(parent, child)| pipeline.with_dependency(&names[parent], &names[child]),
    )
}

proptest! {
    #[test]
    fn prop_leveling_is_deterministic((names, edges) in dags()) {
        let diagram = PipelineDiagram::new(pipeline(&names, &edges), AppConfig::default()).unwrap();

        prop_assert_eq!(diagram.levels().unwrap(), diagram.levels().unwrap());
        prop_assert_eq!(diagram.layout().unwrap(), diagram.layout().unwrap());
    }

    #[test]
    fn prop_levels_respect_dependencies((names, edges) in dags()) {
        let pipeline = pipeline(&names, &edges);
        let diagram = PipelineDiagram::new(pipeline.clone(), AppConfig::default()).unwrap();
        let levels = diagram.levels().unwrap();

        // Every node in exactly one level
        let placed: Vec<&String> = levels.iter().flatten().collect();
        let unique: BTreeSet<&String> = placed.iter().copied().collect();
        prop_assert_eq!(placed.len(), names.len());
        prop_assert_eq!(unique.len(), names.len());

        // Level 0 is exactly the parentless nodes
        let children: BTreeSet<&str> = pipeline.edges().map(|(_, child)| child).collect();
        let roots: BTreeSet<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|name| !children.contains(name))
            .collect();
        let level_zero: BTreeSet<&str> = levels[0].iter().map(String::as_str).collect();
        prop_assert_eq!(level_zero, roots);

        // Parents sit strictly left of their children
        let level_of = |name: &str| levels.iter().position(|level| level.iter().any(|n| n == name));
        for (parent, child) in pipeline.edges() {
            prop_assert!(level_of(parent) < level_of(child));
        }

        // Sorted inside each level
        for level in &levels {
            prop_assert!(level.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn prop_layout_spacing((names, edges) in dags()) {
        let diagram = PipelineDiagram::new(pipeline(&names, &edges), AppConfig::default()).unwrap();
        let layout = diagram.layout().unwrap();

        for pair in layout.extents().windows(2) {
            prop_assert_eq!(pair[0].x_end() + GAP_X, pair[1].x_start());
        }

        for (index, extent) in layout.extents().iter().enumerate() {
            let nodes: Vec<_> = layout.level(index).collect();
            prop_assert!(!nodes.is_empty());
            prop_assert_eq!(nodes[0].bounds().min_y(), 0.0);

            for pair in nodes.windows(2) {
                let (upper, lower) = (pair[0].bounds(), pair[1].bounds());
                prop_assert_eq!(upper.max_y() + GAP_Y, lower.min_y());
            }
            for node in &nodes {
                prop_assert_eq!(node.bounds().min_x(), extent.x_start());
                prop_assert!(node.bounds().max_x() <= extent.x_end() + 1e-3);
            }
        }
    }

    #[test]
    fn prop_arrows_stop_outside_children((names, edges) in dags()) {
        let pipeline = pipeline(&names, &edges);
        let diagram = PipelineDiagram::new(pipeline.clone(), AppConfig::default()).unwrap();
        let layout = diagram.layout().unwrap();

        prop_assert_eq!(layout.arrows().len(), pipeline.edges().count());
        for arrow in layout.arrows() {
            let route = arrow.route();
            let child = layout.child(arrow).bounds();
            prop_assert_eq!(route.tip(), child.left_center());
            prop_assert!(!child.contains_strictly(route.end()));
        }
    }

    #[test]
    fn prop_back_edge_is_a_cycle((names, edges) in dags()) {
        prop_assume!(!edges.is_empty());
        let (parent, child) = edges[0];

        let cyclic = pipeline(&names, &edges).with_dependency(&names[child], &names[parent]);
        let diagram = PipelineDiagram::new(cyclic, AppConfig::default()).unwrap();

        match diagram.levels() {
            Err(StrataError::GraphCycle { nodes }) => {
                prop_assert!(nodes.contains(&names[parent]));
                prop_assert!(nodes.contains(&names[child]));
                prop_assert!(nodes.windows(2).all(|pair| pair[0] < pair[1]));
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other),
        }
    }
}
