//! Unit tests for nav-engine.

#[cfg(test)]
mod helpers {
    use nav_core::{GeoPoint, NodeId};
    use nav_spatial::Graph;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// Street of ten nodes along the equator (ids `0..10`, 0.001° apart)
    /// plus a two-node island (ids 100, 101) just west of node 0.
    pub fn street_with_island() -> Graph {
        let mut g = Graph::new();
        for i in 0..10 {
            g.add_node(NodeId(i), GeoPoint::new(0.0, i as f64 * 0.001));
        }
        for i in 1..10 {
            g.add_edge(NodeId(i - 1), NodeId(i)).unwrap();
        }
        g.add_node(NodeId(100), GeoPoint::new(0.0, -0.0010));
        g.add_node(NodeId(101), GeoPoint::new(0.0, -0.0011));
        g.add_edge(NodeId(100), NodeId(101)).unwrap();
        g
    }

    pub fn square() -> Graph {
        let mut g = Graph::new();
        g.add_node(NodeId(1), GeoPoint::new(0.0, 0.0));
        g.add_node(NodeId(2), GeoPoint::new(0.0, 1.0));
        g.add_node(NodeId(3), GeoPoint::new(1.0, 1.0));
        g.add_node(NodeId(4), GeoPoint::new(1.0, 0.0));
        for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 1)] {
            g.add_edge(NodeId(a), NodeId(b)).unwrap();
        }
        g
    }

    pub fn street(n: i64) -> Graph {
        let mut g = Graph::new();
        for i in 0..n {
            g.add_node(NodeId(i), GeoPoint::new(0.0, i as f64 * 0.001));
        }
        for i in 1..n {
            g.add_edge(NodeId(i - 1), NodeId(i)).unwrap();
        }
        g
    }

    /// Connected random city: spanning tree plus chords.
    pub fn random_city(seed: u64, n: i64, extra: usize) -> Graph {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut g = Graph::with_capacity(n as usize);
        for i in 0..n {
            g.add_node(NodeId(i), GeoPoint::new(rng.gen_range(51.45..51.55), rng.gen_range(-0.20..-0.05)));
        }
        for i in 1..n {
            let j = rng.gen_range(0..i);
            g.add_edge(NodeId(i), NodeId(j)).unwrap();
        }
        for _ in 0..extra {
            let (a, b) = (NodeId(rng.gen_range(0..n)), NodeId(rng.gen_range(0..n)));
            g.add_edge(a, b).unwrap();
        }
        g
    }

    pub fn random_points(seed: u64, n: usize) -> Vec<(GeoPoint, GeoPoint)> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut p = || GeoPoint::new(rng.gen_range(51.45..51.55), rng.gen_range(-0.20..-0.05));
        (0..n).map(|_| (p(), p())).collect()
    }
}

#[cfg(test)]
mod config {
    use nav_guide::GuidanceConfig;
    use nav_spatial::{Algorithm, Graph};

    use crate::{EngineConfig, EngineError, NavigatorBuilder};

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.default_algorithm, Algorithm::AStar);
        assert_eq!(c.initial_candidates, 1);
        assert_eq!(c.max_candidates, 8);
        assert_eq!(c.guidance, GuidanceConfig::default());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_initial_candidates_rejected() {
        let c = EngineConfig { initial_candidates: 0, ..Default::default() };
        assert!(matches!(c.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn initial_above_max_rejected() {
        let c = EngineConfig { initial_candidates: 4, max_candidates: 2, ..Default::default() };
        assert!(matches!(NavigatorBuilder::new(Graph::new()).config(c).build(), Err(EngineError::Config(_))));
    }

    #[test]
    fn bad_guidance_rejected_at_build() {
        let c = EngineConfig {
            guidance: GuidanceConfig { turn_threshold_deg: 10.0, small_angle_deg: 20.0 },
            ..Default::default()
        };
        assert!(matches!(NavigatorBuilder::new(Graph::new()).config(c).build(), Err(EngineError::Guide(_))));
    }
}

#[cfg(test)]
mod queries {
    use nav_core::{GeoPoint, NodeId};
    use nav_guide::{Maneuver, total_distance_m};
    use nav_spatial::{Algorithm, SpatialError};

    use super::helpers::{square, street, street_with_island};
    use crate::{EngineError, Navigator, NavigatorBuilder};

    fn nav(g: nav_spatial::Graph) -> Navigator {
        NavigatorBuilder::new(g).build().unwrap()
    }

    #[test]
    fn builder_freezes_graph_and_indexes_every_node() {
        let n = nav(street_with_island());
        assert!(n.graph().is_indexed());
        assert_eq!(n.index().len(), 12);
    }

    #[test]
    fn square_shortest_path_uses_two_edges() {
        let n = nav(square());
        for alg in Algorithm::ALL {
            let r = n.shortest_path(NodeId(1), NodeId(3), alg).unwrap();
            assert_eq!(r.edge_count(), 2, "{alg}");
        }
    }

    #[test]
    fn resolve_routable_skips_isolated_nodes() {
        let mut g = street(10);
        g.add_node(NodeId(50), GeoPoint::new(0.0, 0.0046));
        let n = nav(g);

        let q = GeoPoint::new(0.0, 0.0046);
        assert_eq!(n.resolve_nearest(q, 1, |_| true), vec![NodeId(50)]);
        assert_eq!(n.resolve_routable(q, 1), vec![NodeId(5)]);
        assert_eq!(n.resolve_routable(q, 2), vec![NodeId(5), NodeId(4)]);

        let j = n.route_between(q, GeoPoint::new(0.0, 0.0), Algorithm::AStar).unwrap();
        assert_eq!(j.start, Some(NodeId(5)));
        assert_eq!(j.end, Some(NodeId(0)));
    }

    #[test]
    fn disconnected_components_compare_unreachable() {
        let n = nav(street_with_island());
        let cmp = n.compare(NodeId(100), NodeId(9)).unwrap();
        assert!(!cmp.dijkstra.is_reachable());
        assert!(!cmp.astar.is_reachable());
        assert!(cmp.dijkstra.distance_m.is_infinite());
    }

    #[test]
    fn compare_agrees_on_distance_and_astar_settles_less() {
        let n = nav(street(41));
        let cmp = n.compare(NodeId(20), NodeId(40)).unwrap();
        assert!((cmp.dijkstra.distance_m - cmp.astar.distance_m).abs() < 1e-6);
        assert_eq!(cmp.dijkstra.path, cmp.astar.path);
        assert!(cmp.astar.settled < cmp.dijkstra.settled);
        assert!(cmp.settled_savings() > 0.0);
    }

    #[test]
    fn unknown_node_surfaces_spatial_error() {
        let n = nav(square());
        let err = n.shortest_path(NodeId(1), NodeId(99), Algorithm::Dijkstra).unwrap_err();
        assert!(matches!(err, EngineError::Spatial(SpatialError::NodeNotFound(NodeId(99)))));
    }

    #[test]
    fn straight_street_narrates_start_and_arrival() {
        let n = nav(street(3));
        let out = n.build_instructions(&[NodeId(0), NodeId(1), NodeId(2)], None, None).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].maneuver, Maneuver::Depart);
        assert_eq!(out[1].maneuver, Maneuver::Arrive);
    }

    #[test]
    fn instruction_overrides_layer_on_config() {
        let n = nav(street(3));
        let path = [NodeId(0), NodeId(1), NodeId(2)];
        let out = n.build_instructions(&path, Some(0.0), Some(0.0)).unwrap();
        assert_eq!(out[1].maneuver, Maneuver::ContinueStraight);

        // 40° small angle against the configured 30° turn threshold.
        let err = n.build_instructions(&path, None, Some(40.0)).unwrap_err();
        assert!(matches!(err, EngineError::Guide(_)));
    }

    #[test]
    fn route_between_snaps_routes_and_narrates() {
        let n = nav(square());
        let j = n.route_between(GeoPoint::new(0.01, 0.01), GeoPoint::new(0.99, 0.99), Algorithm::AStar).unwrap();
        assert_eq!(j.start, Some(NodeId(1)));
        assert_eq!(j.end, Some(NodeId(3)));
        assert_eq!(j.attempts, 1);
        assert_eq!(j.route.edge_count(), 2);
        assert_eq!(j.instructions.len(), 3);
        assert!(matches!(j.instructions[1].maneuver, Maneuver::TurnLeft | Maneuver::TurnRight));
        assert!((total_distance_m(&j.instructions) - j.route.distance_m).abs() < 1e-6);
    }

    #[test]
    fn candidates_expand_past_a_disconnected_island() {
        let n = nav(street_with_island());
        let from = GeoPoint::new(0.0, -0.00104);
        let to = GeoPoint::new(0.0, 0.009);

        for alg in Algorithm::ALL {
            let j = n.route_between(from, to, alg).unwrap();
            assert!(j.is_reachable(), "{alg}");
            assert_eq!(j.start, Some(NodeId(0)), "{alg}");
            assert_eq!(j.end, Some(NodeId(9)), "{alg}");
            assert!(j.attempts > 1, "{alg}");
            assert_eq!(j.route.edge_count(), 9);
        }
    }

    #[test]
    fn capped_candidates_leave_journey_unreachable() {
        let cfg = crate::EngineConfig { max_candidates: 1, ..Default::default() };
        let n = NavigatorBuilder::new(street_with_island()).config(cfg).build().unwrap();
        let j = n
            .route_between(GeoPoint::new(0.0, -0.00104), GeoPoint::new(0.0, 0.009), Algorithm::AStar)
            .unwrap();
        assert!(!j.is_reachable());
        assert_eq!(j.start, Some(NodeId(100)));
        assert_eq!(j.end, Some(NodeId(9)));
        assert_eq!(j.attempts, 1);
        assert!(j.instructions.is_empty());
    }

    #[test]
    fn same_snapped_node_is_a_trivial_journey() {
        let n = nav(street(5));
        let j = n.route_between(GeoPoint::new(0.0, 0.002), GeoPoint::new(0.00001, 0.002), Algorithm::Dijkstra).unwrap();
        assert!(j.route.is_trivial());
        assert_eq!(j.route.distance_m, 0.0);
        assert!(j.instructions.is_empty());
    }

    #[test]
    fn empty_graph_yields_unsnapped_journey() {
        let n = nav(nav_spatial::Graph::new());
        let j = n.route_between(GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0), Algorithm::AStar).unwrap();
        assert_eq!(j.start, None);
        assert_eq!(j.end, None);
        assert_eq!(j.attempts, 0);
        assert!(!j.is_reachable());
    }

    #[test]
    fn invalid_coordinate_is_rejected() {
        let n = nav(square());
        let err = n
            .route_between(GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(0.0, 0.0), Algorithm::AStar)
            .unwrap_err();
        assert!(matches!(err, EngineError::Core(_)));
        let err = n
            .route_between(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 200.0), Algorithm::AStar)
            .unwrap_err();
        assert!(matches!(err, EngineError::Core(_)));
    }
}

#[cfg(test)]
mod batch {
    use std::sync::Arc;

    use nav_core::{GeoPoint, NodeId};
    use nav_spatial::Algorithm;

    use super::helpers::{random_city, random_points, street_with_island};
    use crate::{Navigator, NavigatorBuilder};

    #[test]
    fn navigator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Navigator>();
    }

    #[test]
    fn route_many_matches_individual_queries() {
        let n = NavigatorBuilder::new(random_city(7, 300, 150)).build().unwrap();
        let queries = random_points(11, 25);
        let batch = n.route_many(&queries, Algorithm::AStar);
        assert_eq!(batch.len(), queries.len());
        for (got, &(from, to)) in batch.into_iter().zip(&queries) {
            assert_eq!(got.unwrap(), n.route_between(from, to, Algorithm::AStar).unwrap());
        }
    }

    #[test]
    fn default_variants_use_configured_algorithm() {
        for alg in Algorithm::ALL {
            let cfg = crate::EngineConfig { default_algorithm: alg, ..Default::default() };
            let n = NavigatorBuilder::new(random_city(21, 200, 100)).config(cfg).build().unwrap();
            let queries = random_points(23, 6);

            for &(from, to) in &queries {
                assert_eq!(n.route_between_default(from, to).unwrap(), n.route_between(from, to, alg).unwrap());
            }
            let batch: Vec<_> = n.route_many_default(&queries).into_iter().map(Result::unwrap).collect();
            let explicit: Vec<_> = n.route_many(&queries, alg).into_iter().map(Result::unwrap).collect();
            assert_eq!(batch, explicit, "{alg}");
        }
    }

    #[test]
    fn algorithms_agree_on_random_journeys() {
        let n = NavigatorBuilder::new(random_city(3, 250, 120)).build().unwrap();
        for (from, to) in random_points(5, 30) {
            let d = n.route_between(from, to, Algorithm::Dijkstra).unwrap();
            let a = n.route_between(from, to, Algorithm::AStar).unwrap();
            assert!(d.is_reachable() && a.is_reachable());
            assert_eq!((d.start, d.end), (a.start, a.end));
            assert!((d.route.distance_m - a.route.distance_m).abs() <= 1e-6 * d.route.distance_m.max(1.0));
        }
    }

    #[test]
    fn shared_navigator_serves_threads() {
        let n = Arc::new(NavigatorBuilder::new(random_city(9, 200, 80)).build().unwrap());
        let queries = random_points(13, 16);
        let expected: Vec<f64> = queries
            .iter()
            .map(|&(f, t)| n.route_between(f, t, Algorithm::AStar).unwrap().route.distance_m)
            .collect();

        std::thread::scope(|s| {
            for chunk in queries.chunks(4).zip(expected.chunks(4)) {
                let n = Arc::clone(&n);
                s.spawn(move || {
                    for (&(f, t), &want) in chunk.0.iter().zip(chunk.1) {
                        let got = n.route_between(f, t, Algorithm::AStar).unwrap().route.distance_m;
                        assert_eq!(got, want);
                    }
                });
            }
        });
    }

    #[test]
    fn rebuild_and_swap_picks_up_new_edges() {
        let from = GeoPoint::new(0.0, -0.00104);
        let to = GeoPoint::new(0.0, 0.009);

        let shared = Arc::new(NavigatorBuilder::new(street_with_island()).build().unwrap());
        let before = shared.route_between(from, to, Algorithm::AStar).unwrap();
        assert_eq!(before.start, Some(NodeId(0)));

        let mut graph = Arc::try_unwrap(shared).ok().unwrap().into_graph();
        graph.add_edge(NodeId(100), NodeId(0)).unwrap();
        let shared = Arc::new(NavigatorBuilder::new(graph).build().unwrap());

        let after = shared.route_between(from, to, Algorithm::AStar).unwrap();
        assert_eq!(after.start, Some(NodeId(100)));
        assert_eq!(after.attempts, 1);
        assert_eq!(after.route.path.first(), Some(&NodeId(100)));
        assert_eq!(after.route.path.last(), Some(&NodeId(9)));
    }
}
