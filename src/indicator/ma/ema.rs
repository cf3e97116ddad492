use crate::indicator::utils::{close_prices, moving_average};
use crate::indicator::{IndicatorKey, IndicatorValues, TABuilder};
use crate::model::Candle;
use std::marker::PhantomData;

/// 지수이동평균(EMA) 계산 빌더
///
/// 지수이동평균은 최근 데이터에 더 높은 가중치를 부여하는 이동평균입니다.
/// 첫 `period`개 종가의 단순평균으로 시드를 잡으므로 인덱스 `period - 1`부터 값이 존재합니다.
#[derive(Debug)]
pub struct EMABuilder<C: Candle> {
    /// EMA 계산 기간
    pub period: usize,
    _phantom: PhantomData<C>,
}

impl<C> EMABuilder<C>
where
    C: Candle,
{
    /// 새 EMA 빌더 생성
    ///
    /// # Arguments
    /// * `period` - EMA 계산 기간
    ///
    /// # Panics
    /// * 유효하지 않은 기간이 제공되면 패닉 발생
    pub fn new(period: usize) -> Self {
        if period == 0 {
            panic!("EMA 기간은 0보다 커야 합니다");
        }

        EMABuilder {
            period,
            _phantom: PhantomData,
        }
    }

    /// 데이터 벡터에서 EMA 시계열 생성
    pub fn build(&self, data: &[C]) -> IndicatorValues {
        moving_average::ema_series(&close_prices(data), self.period)
    }
}

impl<C> TABuilder<C> for EMABuilder<C>
where
    C: Candle,
{
    fn keys(&self) -> Vec<IndicatorKey> {
        vec![IndicatorKey::Ema(self.period)]
    }

    fn build(&self, data: &[C]) -> Vec<(IndicatorKey, IndicatorValues)> {
        vec![(IndicatorKey::Ema(self.period), EMABuilder::build(self, data))]
    }
}
