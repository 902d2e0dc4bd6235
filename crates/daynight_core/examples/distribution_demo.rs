//! Example: sample a synthetic camera dataset into day and night subsets.
//!
//! Builds an uneven hourly population (busy afternoons, a few night frames),
//! runs the sampler for both groups with a fixed seed and prints the
//! resulting markdown report.
//!
//! Run with `cargo run -p daynight_core --example distribution_demo`.

use daynight_core::{
    config_fingerprint, distribute, render_markdown, rng_from_seed, BucketIndex,
    DayNightPartition, DistributionReport, GroupKind, GroupReport, ParsePolicy,
};

fn frame_name(hour: u8, i: usize) -> String {
    format!("n015-2018-07-18-{hour:02}-{i:02}-00__CAM_FRONT__{i}.jpg")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let names = (0..24u8).flat_map(|hour| {
        let frames = match hour {
            12..=16 => 40,
            6..=11 | 17 => 12,
            _ => 3,
        };
        (0..frames).map(move |i| frame_name(hour, i))
    });
    let index = BucketIndex::build(names, ParsePolicy::Strict)?;
    let (frames, hours) = (index.total(), index.buckets().len());
    println!("Indexed {frames} frames across {hours} hours");

    let partition = DayNightPartition::default();
    let seed = 2023;
    let mut rng = rng_from_seed(Some(seed));

    let mut groups = Vec::new();
    for (kind, target) in [(GroupKind::Day, 50), (GroupKind::Night, 50)] {
        let hours = partition.hours(kind);
        let distribution = distribute(&hours, index.buckets(), target, &mut rng);
        let group = GroupReport::from_distribution(kind, &hours, &index, &distribution);
        groups.push(group);
    }

    let report = DistributionReport {
        dataset: "synthetic".to_string(),
        generated_at: "demo".to_string(),
        groups,
        total_images: index.total(),
        skipped_images: 0,
        ignored_files: 0,
        full_copy_grouping: None,
        seed: Some(seed),
        config_fingerprint: config_fingerprint((partition, seed))?,
    };

    println!("\n{}", render_markdown(&report));
    Ok(())
}
