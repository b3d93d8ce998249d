use crate::model::Weather;
use crate::model_params::WeatherParams;

/// Points removed from the game total for conditions. Never negative.
pub fn weather_penalty(weather: Option<&Weather>, params: &WeatherParams) -> f64 {
    let Some(w) = weather else {
        return 0.0;
    };

    let wind = params
        .wind_tiers
        .iter()
        .filter(|(min_mph, _)| w.wind_mph >= *min_mph)
        .map(|(_, pts)| pts.max(0.0))
        .fold(0.0, f64::max);

    let cold = if w.temp_f < params.freezing_below_f {
        params.freezing_points.max(0.0)
    } else {
        0.0
    };

    let precip = params.precipitation_points(w.precipitation).max(0.0);

    wind + cold + precip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Precipitation;

    fn wx(wind_mph: f64, temp_f: f64, precipitation: Precipitation) -> Weather {
        Weather {
            wind_mph,
            temp_f,
            precipitation,
        }
    }

    #[test]
    fn absent_weather_costs_nothing() {
        assert_eq!(weather_penalty(None, &WeatherParams::default()), 0.0);
    }

    #[test]
    fn calm_mild_dry_costs_nothing() {
        let w = wx(5.0, 55.0, Precipitation::None);
        assert_eq!(weather_penalty(Some(&w), &WeatherParams::default()), 0.0);
    }

    #[test]
    fn wind_never_lowers_penalty() {
        let params = WeatherParams::default();
        for precip in [Precipitation::None, Precipitation::HeavySnow] {
            for temp in [-5.0, 40.0] {
                let mut prev = 0.0;
                for mph in 0..40 {
                    let p = weather_penalty(Some(&wx(f64::from(mph), temp, precip)), &params);
                    assert!(p >= prev, "{mph} mph: {p} < {prev}");
                    prev = p;
                }
            }
        }
    }

    #[test]
    fn wind_tiers_take_largest_match_regardless_of_order() {
        let params = WeatherParams {
            wind_tiers: vec![(20.0, 6.0), (10.0, 1.0), (15.0, 3.0)],
            ..WeatherParams::default()
        };
        let p = weather_penalty(Some(&wx(22.0, 50.0, Precipitation::None)), &params);
        assert_eq!(p, 6.0);
        let p = weather_penalty(Some(&wx(15.0, 50.0, Precipitation::None)), &params);
        assert_eq!(p, 3.0);
    }

    #[test]
    fn components_stack() {
        let w = wx(21.0, -3.0, Precipitation::Blizzard);
        assert_eq!(weather_penalty(Some(&w), &WeatherParams::default()), 16.0);
        let w = wx(12.0, 30.0, Precipitation::HeavyRain);
        assert_eq!(weather_penalty(Some(&w), &WeatherParams::default()), 4.0);
    }
}
