// 약세/강세 공용 규칙 테이블
// 각 평가 함수는 국면을 극성으로 받아 비교 방향만 뒤집습니다.

use crate::analyzer::base::RuleContext;
use crate::analyzer::rule::{RuleDefinition, Tier, Verdict};
use crate::indicator::IndicatorKey;
use crate::indicator::rsi::{is_overbought, is_oversold};
use crate::model::{ChainMetrics, Regime};

/// 지지/저항 계산 구간 (최신 봉 제외)
pub const SUPPORT_RESISTANCE_WINDOW: usize = 20;
/// 지지/저항 돌파 허용 폭
pub const BREAK_MARGIN: f64 = 0.02;
/// RSI 반전/다이버전스 확인 구간 (최신 봉 포함)
pub const MOMENTUM_WINDOW: usize = 10;
/// 다이버전스 가격 근접 비율
pub const DIVERGENCE_PRICE_MARGIN: f64 = 0.02;
/// 다이버전스 RSI 괴리 비율
pub const DIVERGENCE_RSI_MARGIN: f64 = 0.05;
/// MVRV Z-Score 과열 기준
pub const MVRV_OVERHEATED: f64 = 5.0;
/// MVRV Z-Score 건강 구간
pub const MVRV_HEALTHY: (f64, f64) = (0.5, 2.0);
/// SOPR 손익 분기점
pub const SOPR_BREAKEVEN: f64 = 1.0;

/// 선언 순서대로 평가되는 규칙 테이블 (최대 점수 합계 100)
pub static RULE_TABLE: [RuleDefinition; 13] = [
    RuleDefinition {
        bear_id: "EMA_20",
        bull_id: "EMA_20",
        tier: Tier::PrimaryTrend,
        max_points: 20,
        evaluate: ema20_trend,
    },
    RuleDefinition {
        bear_id: "EMA_50",
        bull_id: "EMA_50",
        tier: Tier::PrimaryTrend,
        max_points: 10,
        evaluate: ema50_trend,
    },
    RuleDefinition {
        bear_id: "Death_Cross",
        bull_id: "Golden_Cross",
        tier: Tier::PrimaryTrend,
        max_points: 10,
        evaluate: ema_cross,
    },
    RuleDefinition {
        bear_id: "Lower_Low",
        bull_id: "Higher_High",
        tier: Tier::PriceAction,
        max_points: 10,
        evaluate: swing_extreme,
    },
    RuleDefinition {
        bear_id: "Support",
        bull_id: "Resistance",
        tier: Tier::PriceAction,
        max_points: 8,
        evaluate: support_resistance_break,
    },
    RuleDefinition {
        bear_id: "BB_Breakdown",
        bull_id: "BB_Breakout",
        tier: Tier::PriceAction,
        max_points: 7,
        evaluate: band_break,
    },
    RuleDefinition {
        bear_id: "RSI",
        bull_id: "RSI",
        tier: Tier::Momentum,
        max_points: 8,
        evaluate: rsi_reversal,
    },
    RuleDefinition {
        bear_id: "MACD",
        bull_id: "MACD",
        tier: Tier::Momentum,
        max_points: 7,
        evaluate: macd_cross,
    },
    RuleDefinition {
        bear_id: "Divergence",
        bull_id: "Divergence",
        tier: Tier::Momentum,
        max_points: 5,
        evaluate: divergence,
    },
    RuleDefinition {
        bear_id: "Volume",
        bull_id: "Volume",
        tier: Tier::Volume,
        max_points: 5,
        evaluate: volume_confirmation,
    },
    RuleDefinition {
        bear_id: "OBV",
        bull_id: "OBV",
        tier: Tier::Volume,
        max_points: 5,
        evaluate: obv_direction,
    },
    RuleDefinition {
        bear_id: "MVRV",
        bull_id: "MVRV",
        tier: Tier::ChainData,
        max_points: 3,
        evaluate: mvrv_band,
    },
    RuleDefinition {
        bear_id: "SOPR",
        bull_id: "SOPR",
        tier: Tier::ChainData,
        max_points: 2,
        evaluate: sopr_threshold,
    },
];

/// 국면 방향의 위치 표현
fn side(regime: Regime) -> &'static str {
    match regime {
        Regime::Bear => "아래",
        Regime::Bull => "위",
    }
}

/// 국면 방향의 가격 움직임 표현
fn move_word(regime: Regime) -> &'static str {
    match regime {
        Regime::Bear => "하락",
        Regime::Bull => "상승",
    }
}

fn ema20_trend(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let key = IndicatorKey::Ema(20);
    let latest = ctx.latest();
    let Some(ema) = ctx.indicator(key, latest) else {
        return Verdict::insufficient("EMA20 룩백 부족");
    };

    if !regime.is_beyond(ctx.close(latest), ema) {
        return Verdict::failed(format!("가격이 EMA20 {}에 있지 않음", side(regime)));
    }

    let prev1 = ctx.prev1();
    match ctx.indicator(key, prev1) {
        Some(prev_ema) if regime.is_beyond(ctx.close(prev1), prev_ema) => {
            Verdict::scored(20, format!("가격이 2봉 연속 EMA20 {}", side(regime)))
        }
        _ => Verdict::scored(10, format!("가격이 EMA20 {} (최근 1봉)", side(regime))),
    }
}

fn ema50_trend(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let latest = ctx.latest();
    let Some(ema) = ctx.indicator(IndicatorKey::Ema(50), latest) else {
        return Verdict::insufficient("EMA50 룩백 부족");
    };

    if regime.is_beyond(ctx.close(latest), ema) {
        Verdict::scored(10, format!("가격이 EMA50 {}", side(regime)))
    } else {
        Verdict::failed(format!("가격이 EMA50 {}에 있지 않음", side(regime)))
    }
}

fn ema_cross(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let latest = ctx.latest();
    let (Some(ema50), Some(ema200)) = (
        ctx.indicator(IndicatorKey::Ema(50), latest),
        ctx.indicator(IndicatorKey::Ema(200), latest),
    ) else {
        return Verdict::insufficient("EMA200 룩백 부족");
    };

    let (name, relation) = match regime {
        Regime::Bear => ("데드크로스", "EMA50 < EMA200"),
        Regime::Bull => ("골든크로스", "EMA50 > EMA200"),
    };

    if regime.is_beyond(ema50, ema200) {
        Verdict::scored(10, format!("{} ({})", name, relation))
    } else {
        Verdict::failed(format!("{} 없음", name))
    }
}

fn swing_extreme(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let (latest, prev1) = (ctx.latest(), ctx.prev1());
    let (name, current, previous, relation) = match regime {
        Regime::Bear => ("저점 갱신", ctx.low(latest), ctx.low(prev1), "<"),
        Regime::Bull => ("고점 갱신", ctx.high(latest), ctx.high(prev1), ">"),
    };

    if regime.is_beyond(current, previous) {
        Verdict::scored(
            10,
            format!("{} (${:.0} {} ${:.0})", name, current, relation, previous),
        )
    } else {
        Verdict::failed(format!("{} 없음", name))
    }
}

fn support_resistance_break(
    ctx: &RuleContext<'_>,
    regime: Regime,
    _: Option<&ChainMetrics>,
) -> Verdict {
    let (name, level, factor) = match regime {
        Regime::Bear => (
            "핵심 지지선",
            ctx.preceding_low(SUPPORT_RESISTANCE_WINDOW),
            1.0 - BREAK_MARGIN,
        ),
        Regime::Bull => (
            "핵심 저항선",
            ctx.preceding_high(SUPPORT_RESISTANCE_WINDOW),
            1.0 + BREAK_MARGIN,
        ),
    };

    let Some(level) = level else {
        return Verdict::insufficient(format!(
            "{} 계산에 필요한 {}봉 부족",
            name, SUPPORT_RESISTANCE_WINDOW
        ));
    };

    if regime.is_beyond(ctx.close(ctx.latest()), level * factor) {
        Verdict::scored(8, format!("{} 돌파 (${:.0})", name, level))
    } else {
        Verdict::failed(format!("{} 유지 (${:.0})", name, level))
    }
}

fn band_break(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let (key, name) = match regime {
        Regime::Bear => (IndicatorKey::BBandLower, "볼린저밴드 하단"),
        Regime::Bull => (IndicatorKey::BBandUpper, "볼린저밴드 상단"),
    };

    let latest = ctx.latest();
    let Some(band) = ctx.indicator(key, latest) else {
        return Verdict::insufficient("볼린저밴드 룩백 부족");
    };

    if regime.is_beyond(ctx.close(latest), band) {
        Verdict::scored(7, format!("{} 돌파", name))
    } else {
        Verdict::failed(format!("{} 안쪽", name))
    }
}

fn rsi_reversal(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let key = IndicatorKey::Rsi(14);
    let Some((rsi, prev_rsi)) = ctx.latest_pair(key) else {
        return Verdict::insufficient("RSI 룩백 부족");
    };

    let (was_extreme, exhausted, reversal, exhaustion) = match regime {
        Regime::Bear => (
            ctx.recent_indicator_max(key, MOMENTUM_WINDOW)
                .is_some_and(is_overbought),
            is_oversold(rsi),
            "과매수에서 하락",
            "과매도",
        ),
        Regime::Bull => (
            ctx.recent_indicator_min(key, MOMENTUM_WINDOW)
                .is_some_and(is_oversold),
            is_overbought(rsi),
            "과매도에서 반등",
            "과매수",
        ),
    };

    if was_extreme && regime.is_beyond(rsi, prev_rsi) {
        Verdict::scored(8, format!("RSI {} (현재: {:.1})", reversal, rsi))
    } else if exhausted {
        Verdict::scored(4, format!("RSI {} ({:.1})", exhaustion, rsi))
    } else {
        Verdict::failed(format!("RSI 중립 ({:.1})", rsi))
    }
}

fn macd_cross(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let (Some((macd, prev_macd)), Some((signal, prev_signal))) = (
        ctx.latest_pair(IndicatorKey::MacdLine),
        ctx.latest_pair(IndicatorKey::MacdSignal),
    ) else {
        return Verdict::insufficient("MACD 시그널 룩백 부족");
    };

    let (cross, persist) = match regime {
        Regime::Bear => ("MACD 데드크로스", "MACD 시그널 아래 유지"),
        Regime::Bull => ("MACD 골든크로스", "MACD 시그널 위 유지"),
    };

    let beyond = regime.is_beyond(macd, signal);
    let was_beyond = regime.is_beyond(prev_macd, prev_signal);

    if beyond && !was_beyond {
        Verdict::scored(7, cross)
    } else if beyond {
        Verdict::scored(3, persist)
    } else {
        Verdict::failed(format!("MACD {} 방향 아님", move_word(regime)))
    }
}

fn divergence(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    if ctx.len() < MOMENTUM_WINDOW {
        return Verdict::insufficient(format!("다이버전스 계산에 필요한 {}봉 부족", MOMENTUM_WINDOW));
    }

    let key = IndicatorKey::Rsi(14);
    let latest = ctx.latest();
    let Some(rsi) = ctx.indicator(key, latest) else {
        return Verdict::insufficient("RSI 룩백 부족");
    };

    let detected = match regime {
        Regime::Bear => {
            let near_high = ctx.high(latest)
                >= ctx.recent_high(MOMENTUM_WINDOW) * (1.0 - DIVERGENCE_PRICE_MARGIN);
            let rsi_lower = ctx
                .recent_indicator_max(key, MOMENTUM_WINDOW)
                .is_some_and(|max| rsi < max * (1.0 - DIVERGENCE_RSI_MARGIN));
            near_high && rsi_lower
        }
        Regime::Bull => {
            let near_low = ctx.low(latest)
                <= ctx.recent_low(MOMENTUM_WINDOW) * (1.0 + DIVERGENCE_PRICE_MARGIN);
            let rsi_higher = ctx
                .recent_indicator_min(key, MOMENTUM_WINDOW)
                .is_some_and(|min| rsi > min * (1.0 + DIVERGENCE_RSI_MARGIN));
            near_low && rsi_higher
        }
    };

    let name = match regime {
        Regime::Bear => "약세 다이버전스",
        Regime::Bull => "강세 다이버전스",
    };

    if detected {
        Verdict::scored(5, format!("{} 감지", name))
    } else {
        Verdict::failed("다이버전스 없음")
    }
}

fn volume_confirmation(
    ctx: &RuleContext<'_>,
    regime: Regime,
    _: Option<&ChainMetrics>,
) -> Verdict {
    let latest = ctx.latest();
    let Some(average) = ctx.indicator(IndicatorKey::VolumeMa(20), latest) else {
        return Verdict::insufficient("거래량 MA 룩백 부족");
    };

    if ctx.volume(latest) <= average {
        return Verdict::failed("거래량 평균 이하");
    }

    if regime.is_beyond(ctx.close(latest), ctx.close(ctx.prev1())) {
        Verdict::scored(5, format!("{} 중 거래량 증가", move_word(regime)))
    } else {
        Verdict::scored(
            2,
            format!("거래량 증가했으나 가격 {} 아님", move_word(regime)),
        )
    }
}

fn obv_direction(ctx: &RuleContext<'_>, regime: Regime, _: Option<&ChainMetrics>) -> Verdict {
    let Some((obv, prev_obv)) = ctx.latest_pair(IndicatorKey::Obv) else {
        return Verdict::insufficient("OBV 없음");
    };

    if regime.is_beyond(obv, prev_obv) {
        Verdict::scored(5, format!("OBV {}", move_word(regime)))
    } else {
        Verdict::failed(format!("OBV {} 아님", move_word(regime)))
    }
}

fn mvrv_band(_: &RuleContext<'_>, regime: Regime, chain: Option<&ChainMetrics>) -> Verdict {
    let Some(chain) = chain else {
        return Verdict::unavailable("온체인 데이터 없음");
    };
    let Some(z) = chain.mvrv_z_score else {
        return Verdict::unavailable("MVRV 데이터 없음");
    };

    let (met, name) = match regime {
        Regime::Bear => (z > MVRV_OVERHEATED, "MVRV 과열"),
        Regime::Bull => (z > MVRV_HEALTHY.0 && z < MVRV_HEALTHY.1, "MVRV 건강 구간"),
    };

    if met {
        Verdict::scored(3, format!("{} ({:.2})", name, z))
    } else {
        Verdict::failed(format!("{} 아님 ({:.2})", name, z))
    }
}

fn sopr_threshold(_: &RuleContext<'_>, regime: Regime, chain: Option<&ChainMetrics>) -> Verdict {
    let Some(chain) = chain else {
        return Verdict::unavailable("온체인 데이터 없음");
    };
    let Some(sopr) = chain.sopr else {
        return Verdict::unavailable("SOPR 데이터 없음");
    };

    let relation = match regime {
        Regime::Bear => "<",
        Regime::Bull => ">",
    };

    if regime.is_beyond(sopr, SOPR_BREAKEVEN) {
        Verdict::scored(2, format!("SOPR {} 1.0 ({:.3})", relation, sopr))
    } else {
        Verdict::failed(format!("SOPR {} 1.0 아님 ({:.3})", relation, sopr))
    }
}
