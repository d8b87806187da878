//! 환율, 금 시세, 펀드 기준가 도메인 모델.

mod exchange_rate;
mod fund;
mod gold;
mod normalize;

pub use exchange_rate::*;
pub use fund::*;
pub use gold::*;
pub use normalize::*;
