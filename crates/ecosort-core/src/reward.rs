//! Coin rewards per waste category.

/// Reward for categories missing from the table
pub const DEFAULT_REWARD: u32 = 10;

const REWARD_TABLE: [(&str, u32); 5] = [
    ("bio-degradable", 15),
    ("plastic", 25),
    ("e-waste", 50),
    ("hazardous", 40),
    ("other", DEFAULT_REWARD),
];

/// Coins credited for a classified item. Total: unknown labels earn the
/// `other` amount, so every successful classification yields some reward.
pub fn reward_for(category: &str) -> u32 {
    REWARD_TABLE
        .iter()
        .find(|(label, _)| *label == category)
        .map(|(_, coins)| *coins)
        .unwrap_or(DEFAULT_REWARD)
}
