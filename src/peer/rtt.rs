/// Jacobson/Karels RTT estimator with fixed-point 1/8 and 1/4 fractions.
///
/// The variance term intentionally uses the *updated* `srtt`, not the
/// pre-update value — this is the documented behavior of the system this
/// was modeled on and is reproduced exactly, not "fixed".
#[derive(Debug, Clone)]
pub struct RttEstimator {
    srtt: f64,
    rttvar: f64,
    last: f64,
    lowest_srtt: Option<f64>,
    highest_rttvar: Option<f64>,
}

impl RttEstimator {
    pub fn new() -> RttEstimator {
        RttEstimator {
            srtt: 0.0,
            rttvar: 0.0,
            last: 0.0,
            lowest_srtt: None,
            highest_rttvar: None,
        }
    }

    /// Folds one RTT sample into the estimate. Negative samples are
    /// ignored (a sample can go negative if the peer-local clock wraps
    /// or a reply races a reconnect).
    pub fn update(&mut self, sample_ms: f64) {
        if sample_ms < 0.0 {
            return;
        }

        self.last = sample_ms;

        let old_srtt = self.srtt;
        self.rttvar -= self.rttvar / 4.0;
        self.srtt += (sample_ms - old_srtt) / 8.0;

        let updated_delta = sample_ms - self.srtt;
        if sample_ms >= old_srtt {
            self.rttvar += updated_delta / 4.0;
        } else {
            self.rttvar -= updated_delta / 4.0;
        }

        self.lowest_srtt = Some(match self.lowest_srtt {
            Some(lowest) => lowest.min(self.srtt),
            None => self.srtt,
        });
        self.highest_rttvar = Some(match self.highest_rttvar {
            Some(highest) => highest.max(self.rttvar),
            None => self.rttvar,
        });
    }

    pub fn last_round_trip_time(&self) -> f64 {
        self.last
    }

    pub fn smoothed(&self) -> f64 {
        self.srtt
    }

    pub fn variance(&self) -> f64 {
        self.rttvar
    }

    pub fn lowest_srtt(&self) -> f64 {
        self.lowest_srtt.unwrap_or(0.0)
    }

    pub fn highest_rttvar(&self) -> f64 {
        self.highest_rttvar.unwrap_or(0.0)
    }
}

impl Default for RttEstimator {
    fn default() -> RttEstimator {
        RttEstimator::new()
    }
}
