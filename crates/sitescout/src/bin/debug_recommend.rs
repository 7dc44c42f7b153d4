use clap::Parser;
use sitescout::debug_helpers::{init_tracing, load_businesses, load_config, DatasetArgs};
use std::time::Instant;

#[derive(Parser)]
struct Args {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Business category to site
    #[arg(long)]
    category: String,

    /// Fixed seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Also print the full result as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    init_tracing();

    let args = Args::parse();
    let businesses = load_businesses(&args.dataset.dataset);
    let config = load_config(args.dataset.config.as_deref());

    let t = Instant::now();
    let (result, debug) =
        sitescout::find_optimal_location_debug(&businesses, &args.category, &config, args.seed)
            .unwrap();
    let elapsed = t.elapsed();

    println!(
        "{} records, category {:?}{}, seed {}, {:?}",
        businesses.len(),
        args.category,
        if debug.category_fallback { " (fallback: all records)" } else { "" },
        debug.seed,
        elapsed,
    );

    for (i, k) in debug.k_candidates.iter().enumerate() {
        let marker = if *k == debug.selected_k { " <" } else { "" };
        println!(
            "  k={k}: inertia {:.6}, {} iterations, converged: {}{marker}",
            debug.candidate_inertias[i],
            debug.candidate_loop_iterations[i],
            debug.candidate_converged[i],
        );
    }
    println!(
        "  final loop: {} iterations, converged: {}",
        debug.kmeans_loop_iterations, debug.kmeans_converged
    );

    for score in &debug.cluster_scores {
        let cluster = &result.clusters[score.cluster_id];
        let marker = if score.cluster_id == debug.selected_cluster { " <" } else { "" };
        println!(
            "  cluster {} ({}): {} members, score {:.3}, centroid ({:.6}, {:.6}){marker}",
            cluster.id,
            cluster.color,
            score.members,
            score.score,
            cluster.centroid.latitude,
            cluster.centroid.longitude,
        );
    }

    let location = result.recommended_location;
    println!(
        "recommended: ({:.6}, {:.6}) in {} zone{}",
        location.latitude,
        location.longitude,
        result.zone_type,
        match debug.snapped_to {
            Some(id) => format!(", snapped to business {id}"),
            None => String::new(),
        },
    );

    let ca = &result.competitor_analysis;
    println!(
        "competitors: {} total, {}/{}/{} within 0.5/1/2 km, saturation {:.2}",
        ca.competitor_count,
        ca.competitors_within_500m,
        ca.competitors_within_1km,
        ca.competitors_within_2km,
        ca.market_saturation,
    );
    if let Some(nearest) = ca.nearest_competitor {
        println!("  nearest: {} ({:.3} km)", nearest.name, ca.distance_to_nearest);
    }
    println!(
        "confidence {:.2}, opportunity score {:.3}: {}",
        result.analysis.confidence, result.analysis.opportunity_score, result.analysis.opportunity
    );
    println!("  {}", ca.recommended_strategy);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    }
}
