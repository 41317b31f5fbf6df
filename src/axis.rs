//! Rotation axes and per-axis containers

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three rotation axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Pitch,
    Roll,
    Yaw,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Pitch, Axis::Roll, Axis::Yaw];

    pub fn name(self) -> &'static str {
        match self {
            Axis::Pitch => "pitch",
            Axis::Roll => "roll",
            Axis::Yaw => "yaw",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Triad<T> {
    pub pitch: T,
    pub roll: T,
    pub yaw: T,
}

impl<T> Triad<T> {
    pub fn new(pitch: T, roll: T, yaw: T) -> Self {
        Self { pitch, roll, yaw }
    }

    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::Pitch => &self.pitch,
            Axis::Roll => &self.roll,
            Axis::Yaw => &self.yaw,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::Pitch => &mut self.pitch,
            Axis::Roll => &mut self.roll,
            Axis::Yaw => &mut self.yaw,
        }
    }

    /// Iterate in pitch, roll, yaw order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        Axis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    pub fn map<U>(self, mut f: impl FnMut(Axis, T) -> U) -> Triad<U> {
        Triad {
            pitch: f(Axis::Pitch, self.pitch),
            roll: f(Axis::Roll, self.roll),
            yaw: f(Axis::Yaw, self.yaw),
        }
    }

    /// Like `map`, stopping at the first error in pitch, roll, yaw order.
    pub fn try_map<U, E>(self, mut f: impl FnMut(Axis, T) -> Result<U, E>) -> Result<Triad<U>, E> {
        Ok(Triad {
            pitch: f(Axis::Pitch, self.pitch)?,
            roll: f(Axis::Roll, self.roll)?,
            yaw: f(Axis::Yaw, self.yaw)?,
        })
    }

    pub fn as_ref(&self) -> Triad<&T> {
        Triad {
            pitch: &self.pitch,
            roll: &self.roll,
            yaw: &self.yaw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triad_order_and_lookup() {
        let triad = Triad::new(1, 2, 3);
        let axes: Vec<Axis> = triad.iter().map(|(a, _)| a).collect();
        assert_eq!(axes, Axis::ALL.to_vec());
        assert_eq!(*triad.get(Axis::Roll), 2);
    }

    #[test]
    fn test_try_map_stops_on_error() {
        let triad = Triad::new(1, -1, 3);
        let mut seen = Vec::new();
        let out: Result<Triad<i32>, Axis> = triad.try_map(|axis, v| {
            seen.push(axis);
            if v < 0 {
                Err(axis)
            } else {
                Ok(v * 2)
            }
        });
        assert_eq!(out.unwrap_err(), Axis::Roll);
        assert_eq!(seen, vec![Axis::Pitch, Axis::Roll]);
    }

    #[test]
    fn test_axis_serde_name() {
        let json = serde_json::to_string(&Axis::Yaw).unwrap();
        assert_eq!(json, "\"yaw\"");
    }
}
