use kplusplus::{fit, Dataset, FitOptions, FitResult, RefinementStrategy, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn report(label: &str, result: &FitResult) {
    info!(
        label,
        k = result.k(),
        dispersion = result.dispersion(),
        converged = result.converged(),
        n_iter = result.n_iter(),
        seed = ?result.seed(),
        assignment = ?result.assignment(),
        "fit"
    );
    for (c, center) in result.centers().iter().enumerate() {
        info!(label, cluster = c, center = ?center.as_slice(), "center");
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let pairs = Dataset::from_rows(&[[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]])?;
    let options = FitOptions::new(2).with_seed(42).with_n_init(4);
    report("pairs/mean", &fit(&pairs, &options)?);

    let outlier = Dataset::from_rows(&[[1.0, 1.0], [1.0, 2.0], [2.0, 1.0], [1000.0, 1000.0]])?;
    report("outlier/mean", &fit(&outlier, &options)?);
    report(
        "outlier/medoid",
        &fit(&outlier, &options.clone().with_strategy(RefinementStrategy::Medoid))?,
    );

    Ok(())
}
