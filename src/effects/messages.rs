//! Feedback and encouragement text shown to the player

use rand::seq::SliceRandom;
use rand::Rng;

pub const CORRECT: &str = "✅ 好棒！🎉 (Great!)";
pub const WRONG: &str = "❌ 再试一次！😊 (Try again!)";
pub const GAME_COMPLETE: &str = "游戏完成！🏆 (Game Complete!)";

/// Shown at random when a stage is cleared
pub const MOTIVATIONAL: [&str; 12] = [
    "做得好！🎉 (Well done!)",
    "太棒了！🌟 (Awesome!)",
    "继续加油！💪 (Keep it up!)",
    "你很厉害！😊 (You're amazing!)",
    "真聪明！🚀 (So smart!)",
    "了不起！🏆 (Fantastic!)",
    "超级棒！👍 (Super great!)",
    "好厉害哦！🎈 (Really awesome!)",
    "你是最棒的！🌈 (You're the best!)",
    "干得漂亮！✨ (Nicely done!)",
    "哇，太强了！💥 (Wow, so strong!)",
    "进步真大！🎊 (Great progress!)",
];

pub fn motivational<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MOTIVATIONAL.choose(rng).copied().unwrap_or(MOTIVATIONAL[0])
}

/// Stage indicator, 1-based
pub fn stage_label(stage_number: usize) -> String {
    format!("第{}阶段 (Stage {})", stage_number, stage_number)
}
