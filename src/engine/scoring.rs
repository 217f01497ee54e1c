pub const BASE_POINTS: u32 = 100;
pub const MAX_TIME_BONUS: u32 = 50;

/// Bonus for unused time: floor(remaining / limit * 50).
pub fn time_bonus(remaining: u32, time_limit: u32) -> u32 {
    if time_limit == 0 {
        return 0;
    }
    let remaining = remaining.min(time_limit) as u64;
    (remaining * MAX_TIME_BONUS as u64 / time_limit as u64) as u32
}

/// Points for a correct submission. Incorrect submissions score nothing and
/// never reach this.
pub fn points_for_correct(remaining: u32, time_limit: u32) -> u32 {
    BASE_POINTS + time_bonus(remaining, time_limit)
}
