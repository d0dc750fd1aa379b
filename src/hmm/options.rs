use serde::{Deserialize, Serialize};

use crate::{errors::Error, Result};

/// Splits a `name=value` parameter; a missing `=` leaves an empty value for `set` to reject.
pub fn split_parameter(s: &str) -> (&str, &str) {
    s.split_once('=').unwrap_or((s, ""))
}

/// Parameters of the probability estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainOptions {
    /// Smoothing weight used when a one-count weight is absent or zero.
    pub lambda_floor: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self { lambda_floor: 1e-100 }
    }
}

impl TrainOptions {
    pub(crate) fn is_valid_floor(v: f64) -> bool {
        v > 0.0 && v.is_finite()
    }

    /// Sets a parameter from its textual `name=value` form.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "lambda_floor" => {
                let v: f64 = value.parse().map_err(|_| Error::invalid_parameter(name, value))?;
                if !Self::is_valid_floor(v) {
                    return Err(Error::invalid_parameter(name, value));
                }
                self.lambda_floor = v;
            }
            _ => return Err(Error::invalid_parameter(name, value)),
        }
        Ok(())
    }
}

/// Parameters of Viterbi decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Score the transition into the closing boundary tag at the end of a sentence.
    pub close_sentence: bool,
    /// Restrict known words to the tags they were observed with.
    pub tag_dictionary: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            close_sentence: true,
            tag_dictionary: false,
        }
    }
}

impl DecodeOptions {
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let flag: bool = value.parse().map_err(|_| Error::invalid_parameter(name, value))?;
        match name {
            "close_sentence" => self.close_sentence = flag,
            "tag_dictionary" => self.tag_dictionary = flag,
            _ => return Err(Error::invalid_parameter(name, value)),
        }
        Ok(())
    }
}
