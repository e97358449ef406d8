use rand::Rng;
use rand::RngExt;

/// Pick uniformly from `options`, excluding the single `previous` value when
/// other choices remain. A one-element pool therefore repeats rather than
/// returning nothing. Empty pool yields `None`.
pub fn pick_different<'a>(
    options: &'a [String],
    previous: Option<&str>,
    rng: &mut impl Rng,
) -> Option<&'a str> {
    if options.is_empty() {
        return None;
    }
    let candidates: Vec<&String> = options
        .iter()
        .filter(|value| Some(value.as_str()) != previous)
        .collect();
    if candidates.is_empty() {
        return Some(pick_uniform(options, rng));
    }
    let index = rng.random_range(0..candidates.len());
    Some(candidates[index].as_str())
}

/// Pick uniformly from `pool`, excluding everything in `recent`. Falls back
/// to the unfiltered pool when the exclusion would leave no candidates, so a
/// pool no larger than the history still serves something.
pub fn pick_excluding<'a>(
    pool: &'a [String],
    recent: &[String],
    rng: &mut impl Rng,
) -> Option<&'a str> {
    if pool.is_empty() {
        return None;
    }
    let candidates: Vec<&String> = pool
        .iter()
        .filter(|value| !recent.contains(value))
        .collect();
    if candidates.is_empty() {
        return Some(pick_uniform(pool, rng));
    }
    let index = rng.random_range(0..candidates.len());
    Some(candidates[index].as_str())
}

/// Append `chosen` to the history, dropping any earlier occurrence so values
/// stay unique, and trim to the last `max_recent` entries (oldest first out).
pub fn update_recent(recent: &[String], chosen: Option<&str>, max_recent: usize) -> Vec<String> {
    let mut updated: Vec<String> = recent
        .iter()
        .filter(|value| Some(value.as_str()) != chosen)
        .cloned()
        .collect();
    if let Some(chosen) = chosen {
        updated.push(chosen.to_string());
    }
    if updated.len() > max_recent {
        updated.drain(..updated.len() - max_recent);
    }
    updated
}

fn pick_uniform<'a>(options: &'a [String], rng: &mut impl Rng) -> &'a str {
    options[rng.random_range(0..options.len())].as_str()
}
