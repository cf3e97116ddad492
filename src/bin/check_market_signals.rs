use log::{debug, error, info};
use std::env;
use std::path::PathBuf;

use market_cycle_signal::alert::{Dispatcher, LogDispatcher, formatter};
use market_cycle_signal::analyzer::RegimeScore;
use market_cycle_signal::analyzer::signal_strength_analyzer::headline;
use market_cycle_signal::config_loader::ConfigLoader;
use market_cycle_signal::monitor::MonitorConfig;
use market_cycle_signal::{CandleSeries, ChainMetrics, OhlcvCandle, SignalEngine};

fn print_breakdown(score: &RegimeScore, effective: u32) {
    println!("{}", "=".repeat(80));
    println!(
        "[{}] {} 신호 점수: {}/100 (원점수 {}/{}, 평가 가능 {})",
        score.regime,
        score.regime.label(),
        effective,
        score.total,
        score.max_total(),
        score.available_max
    );
    println!("{}", "=".repeat(80));
    for result in &score.breakdown {
        println!("  {}", result);
    }
}

fn main() {
    // 로그 초기화
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    debug!("커맨드 라인 인수: {:?}", args);

    if args.len() < 2 {
        error!("인수가 충분하지 않습니다. 캔들 파일 경로가 필요합니다.");
        println!(
            "사용법: {} <캔들_JSON_파일> [설정_파일_경로] [MVRV_Z] [SOPR]",
            args[0]
        );
        return;
    }

    let candles_path = PathBuf::from(&args[1]);
    let config = match args.get(2) {
        Some(path) => match ConfigLoader::load_or_default::<MonitorConfig>(&PathBuf::from(path)) {
            Ok(config) => config,
            Err(err) => {
                error!("설정 로드 실패: {}", err);
                println!("설정 로드 실패: {}", err);
                return;
            }
        },
        None => {
            debug!("기본 설정 사용");
            MonitorConfig::default()
        }
    };

    let chain = {
        let parse = |index: usize| args.get(index).and_then(|v| v.parse::<f64>().ok());
        let metrics = ChainMetrics::new(parse(3), parse(4));
        (config.use_chain_metrics && !metrics.is_empty()).then_some(metrics)
    };

    let content = match std::fs::read_to_string(&candles_path) {
        Ok(content) => content,
        Err(err) => {
            error!("캔들 파일 읽기 실패: {} - {}", candles_path.display(), err);
            println!("캔들 파일 읽기 실패: {}", err);
            return;
        }
    };

    let candles: Vec<OhlcvCandle> = match serde_json::from_str(&content) {
        Ok(candles) => candles,
        Err(err) => {
            error!("캔들 파싱 실패: {}", err);
            println!("캔들 파싱 실패: {}", err);
            return;
        }
    };
    info!("캔들 {}개 로드: {}", candles.len(), candles_path.display());

    let series = match CandleSeries::annotated(candles) {
        Ok(series) => series,
        Err(err) => {
            error!("{}", err);
            println!("{}", err);
            return;
        }
    };

    let engine = SignalEngine::new(config.engine);
    let evaluation = match engine.evaluate(&series, chain.as_ref()) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            error!("{}", err);
            println!("평가 실패: {}", err);
            return;
        }
    };

    let analyzer = config.engine.analyzer();
    println!("{} 시장 신호 점검 결과 ({})", config.symbol, config.timeframe);
    if let Some(latest) = series.latest() {
        println!("현재 가격: ${}", formatter::with_thousands(latest.close, 2));
        println!("점검 기준: {}", latest.open_time.format("%Y-%m-%d"));
    }
    print_breakdown(&evaluation.bear, analyzer.effective_score(&evaluation.bear));
    print_breakdown(&evaluation.bull, analyzer.effective_score(&evaluation.bull));
    println!("{}", "=".repeat(80));

    let decision = &evaluation.decision;
    match series.latest() {
        Some(latest) if decision.is_dispatchable() => {
            let message = formatter::format(decision, latest);
            println!("\n{}\n", message);

            let dispatcher = LogDispatcher::new(config.symbol.clone());
            if let Err(err) = dispatcher.dispatch(&message, decision.priority) {
                error!("{}", err);
            }
        }
        _ => println!(
            "[{}] {} (점수 {})",
            decision.classification,
            headline(decision.classification, decision.regime),
            decision.score
        ),
    }
}
