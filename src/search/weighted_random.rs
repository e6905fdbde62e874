use rand::Rng;

/// Picks one of `items` with probability proportional to its weight.
/// `None` if there is nothing with a positive weight to pick.
pub fn weighted_random<'a, T, R: Rng + ?Sized>(
    items: &'a [(T, u32)],
    rng: &mut R,
) -> Option<&'a (T, u32)> {
    let total_weight: u32 = items.iter().map(|(_, weight)| weight).sum();
    if total_weight == 0 {
        return None;
    }
    let random = rng.gen_range(0..total_weight);
    let mut current_weight = 0;
    for item in items {
        current_weight += item.1;
        if current_weight > random {
            return Some(item);
        }
    }
    None
}
