use crate::analyzer::signal_strength_analyzer::{AlertDecision, SignalClassification, headline};
use crate::model::{Candle, Regime};

const FOOTER: &str = "_시장 사이클 신호 엔진 자동 생성_";

fn emoji(classification: SignalClassification, regime: Option<Regime>) -> &'static str {
    match (classification, regime) {
        (SignalClassification::Strong, Some(Regime::Bear)) => "🚨🔴",
        (SignalClassification::Confirmed, Some(Regime::Bear)) => "🔴",
        (SignalClassification::Strong, Some(Regime::Bull)) => "🎉🟢",
        (SignalClassification::Confirmed, Some(Regime::Bull)) => "🟢",
        (SignalClassification::Watch, Some(_)) => "🟡",
        _ => "⚪",
    }
}

/// 분류·국면별 권고 문구
pub fn recommendation(classification: SignalClassification, regime: Option<Regime>) -> &'static str {
    match (classification, regime) {
        (SignalClassification::Strong, Some(Regime::Bear)) => {
            "**강력 권고**: 즉시 전략적 비중 축소, 위험 노출 50-100% 감소"
        }
        (SignalClassification::Confirmed, Some(Regime::Bear)) => {
            "**권고**: 분할 매도로 위험 노출 25-50% 감소"
        }
        (SignalClassification::Strong, Some(Regime::Bull)) => {
            "**강력 권고**: 적극적 매수 또는 추가 매수, 위험 노출 50-100% 확대"
        }
        (SignalClassification::Confirmed, Some(Regime::Bull)) => {
            "**권고**: 분할 매수로 위험 노출 25-50% 확대"
        }
        (SignalClassification::Watch, Some(_)) => "**권고**: 관망하며 추가 확인 대기",
        _ => "**권고**: 중립, 계속 관찰",
    }
}

/// 천 단위 구분 기호를 넣은 숫자 문자열
pub fn with_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut result = String::with_capacity(formatted.len() + integer.len() / 3 + 1);
    if value.is_sign_negative() && value != 0.0 {
        result.push('-');
    }
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if let Some(fraction) = fraction {
        result.push('.');
        result.push_str(fraction);
    }
    result
}

/// 알림 결정을 전송용 메시지로 렌더링합니다.
///
/// 같은 입력에는 항상 같은 문자열을 만들며, 규칙 상세는 규칙 테이블 선언 순서를 따릅니다.
pub fn format<C: Candle>(decision: &AlertDecision, latest: &C) -> String {
    let emoji = emoji(decision.classification, decision.regime);
    let atr = decision
        .atr
        .map(|atr| format!("${}", with_thousands(atr, 2)))
        .unwrap_or_else(|| "N/A".to_string());

    let mut message = format!(
        "{emoji} **{title}** {emoji}\n\n\
         **감지 시각**: {date}\n\
         **가격**: ${price}\n\
         **신호 점수**: {score}/100\n\
         **변동성(ATR 14)**: {atr}\n\n\
         **지표 상세**:\n",
        emoji = emoji,
        title = headline(decision.classification, decision.regime),
        date = latest.datetime().format("%Y-%m-%d"),
        price = with_thousands(latest.close_price(), 2),
        score = decision.score,
        atr = atr,
    );

    for result in &decision.breakdown {
        message.push_str(&format!("{} → {}\n", result.rule_id, result.verdict));
    }

    message.push('\n');
    message.push_str(recommendation(decision.classification, decision.regime));
    message.push_str("\n\n");
    message.push_str(FOOTER);
    message
}
