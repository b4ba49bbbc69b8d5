/// Activity level of the user at `rank` (1-based) among `users`:
/// `ceil(users / rank^alpha)`. Never below one.
pub fn activity(users: usize, rank: usize, alpha: f64) -> usize {
    let rank = rank.max(1) as f64;
    let level = (users as f64 / rank.powf(alpha)).ceil();
    (level as usize).max(1)
}

/// Posts a user at the given activity level writes.
pub fn posts_for(activity: usize, users: usize) -> usize {
    1 + (activity as f64 / users.max(1) as f64 * 5.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_of_the_curve_is_everyone() {
        assert_eq!(activity(50, 1, 1.3), 50);
        assert_eq!(posts_for(50, 50), 6);
    }

    #[test]
    fn activity_falls_with_rank() {
        let levels: Vec<usize> = (1..=50).map(|rank| activity(50, rank, 1.3)).collect();
        assert!(levels.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(activity(50, 2, 1.3), 21);
        assert_eq!(*levels.last().unwrap(), 1);
    }

    #[test]
    fn tail_users_still_post_once() {
        assert_eq!(posts_for(activity(50, 50, 1.3), 50), 1);
        assert_eq!(activity(10, 0, 2.0), 10);
    }
}
