use skyline_procgen::{
    Biome, ChunkSummary, FeatureKind, LOOKAHEAD_MARGIN, ParallaxLayer, PlacedObject, TreeConfig,
    WorldGenerator,
};

fn single_layer() -> Vec<ParallaxLayer> {
    vec![ParallaxLayer::new(1.0, 0.0, 1.0)]
}

fn first_chunks(seed: &str, count: usize) -> Vec<ChunkSummary> {
    let mut generator = WorldGenerator::new(seed, 1);
    let mut layers = single_layer();
    let mut chunks = Vec::new();
    let mut camera_x = 0.0;
    while chunks.len() < count {
        chunks.extend(generator.generate(&mut layers, camera_x, 800.0).chunks);
        camera_x += 250.0;
    }
    chunks.truncate(count);
    chunks
}

#[test]
fn test_first_generate_fills_to_lookahead() {
    let mut generator = WorldGenerator::new("alpha", 1);
    let mut layers = single_layer();
    let report = generator.generate(&mut layers, 0.0, 800.0);

    assert!(
        generator.frontier(0) >= 800.0 + LOOKAHEAD_MARGIN,
        "frontier {} short of lookahead",
        generator.frontier(0)
    );
    assert!(!report.chunks.is_empty());
    assert!(!layers[0].is_empty());
    assert_eq!(report.chunks[0].x, 0.0);

    // A second call with the same camera has nothing left to do.
    let again = generator.generate(&mut layers, 0.0, 800.0);
    assert!(again.chunks.is_empty());
}

#[test]
fn test_same_seed_same_first_chunks() {
    let a = first_chunks("alpha", 50);
    let b = first_chunks("alpha", 50);
    assert_eq!(a.len(), 50);
    for (i, (x, y)) in a.iter().zip(&b).enumerate() {
        assert_eq!(x.ground, y.ground, "chunk {i} ground differs");
        assert_eq!(x.feature, y.feature, "chunk {i} feature differs");
        assert_eq!(x.width, y.width, "chunk {i} width differs");
    }
}

#[test]
fn test_different_seeds_diverge() {
    let a = first_chunks("alpha", 50);
    let b = first_chunks("beta", 50);
    assert_ne!(a, b);
}

#[test]
fn test_all_vegetation_disabled() {
    let mut trees = TreeConfig::default();
    trees.set_all_enabled(false);

    for seed in ["alpha", "beta", "gamma", "delta", ""] {
        let mut generator = WorldGenerator::with_tree_config(seed, 4, &trees);
        let mut layers = vec![
            ParallaxLayer::new(0.2, 150.0, 1.0),
            ParallaxLayer::new(0.4, 100.0, 1.0),
            ParallaxLayer::new(0.6, 50.0, 1.0),
            ParallaxLayer::new(1.0, 0.0, 1.0),
        ];
        let mut seen_biomes = Vec::new();
        let mut gaps = 0;
        // Large steps with fixed pacing still walk the biome chain given
        // enough calls.
        for step in 0..12_000 {
            let camera_x = f64::from(step) * 40.0;
            let report = generator.generate(&mut layers, camera_x, 1280.0);
            for chunk in &report.chunks {
                assert_ne!(chunk.feature, FeatureKind::Vegetation, "seed {seed:?}");
                if chunk.feature == FeatureKind::Gap {
                    gaps += 1;
                }
            }
            if !seen_biomes.contains(&report.biome) {
                seen_biomes.push(report.biome);
            }
            for layer in &mut layers {
                layer.prune(camera_x, 2000.0);
                assert!(
                    !layer
                        .objects()
                        .iter()
                        .any(|o| matches!(o, PlacedObject::Vegetation(_)))
                );
            }
        }
        assert!(gaps > 0, "seed {seed:?} produced no gaps");
        assert!(seen_biomes.len() > 1, "seed {seed:?} never left {:?}", seen_biomes);
    }
}

#[test]
fn test_empty_config_behaves_like_disabled() {
    let mut generator = WorldGenerator::with_tree_config("empty", 1, &TreeConfig::empty());
    let mut layers = single_layer();
    for step in 0..500 {
        let report = generator.generate(&mut layers, f64::from(step) * 100.0, 800.0);
        assert!(
            report
                .chunks
                .iter()
                .all(|c| c.feature != FeatureKind::Vegetation)
        );
    }
}

#[test]
fn test_cactus_only_in_desert() {
    let mut trees = TreeConfig::empty();
    trees.set_enabled(skyline_procgen::TreeKind::Cactus, true);
    let mut generator = WorldGenerator::with_tree_config("dunes", 1, &trees);
    let mut layers = single_layer();
    for step in 0..20_000 {
        let report = generator.generate(&mut layers, f64::from(step) * 20.0, 800.0);
        if report.chunks.iter().any(|c| c.feature == FeatureKind::Vegetation) {
            assert_eq!(report.biome, Biome::Desert);
        }
        layers[0].prune(f64::from(step) * 20.0, 0.0);
    }
}
