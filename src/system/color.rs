//! Colour Classification Module
//!
//! Converts raw RGBC sensor readings into pseudo-HSV descriptors and matches
//! them against a set of nine calibrated reference colours by nearest
//! neighbour in a plain L1 metric.
//!
//! The descriptor is deliberately NOT true HSV: saturation and value are raw
//! channel differences/maxima, not normalized ratios, and the hue metric does
//! not wrap around the 0°/360° boundary. The maze walls were calibrated
//! against exactly this arithmetic, so it is kept bit-for-bit.

/// Number of calibrated reference colours
pub const COLOR_COUNT: usize = 9;

/// Any candidate further than this from every reference is rejected
pub const CLASSIFY_SENTINEL: u32 = 20_000;

/// One raw reading of the four sensor channels.
///
/// Channel magnitudes are sensor-defined (16-bit ADC counts); a sample is
/// immutable once taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorSample {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub clear: u16,
}

/// Pseudo-HSV descriptor derived from a [`ColorSample`].
///
/// - `hue`: degrees ×10 in `[0, 3600)`, 0 when the channels are equal
/// - `saturation`: max − min of the RGB channels (0 when `value` is 0)
/// - `value`: max of the RGB channels
/// - `clear`: the clear channel, carried through unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorDescriptor {
    pub hue: u16,
    pub saturation: u16,
    pub value: u16,
    pub clear: u16,
}

impl ColorDescriptor {
    /// Derives the descriptor using the six-region max-channel hue formula,
    /// scaled ×10 and taken mod 3600. Division truncates toward zero.
    pub fn from_sample(sample: &ColorSample) -> Self {
        let ColorSample {
            red: r,
            green: g,
            blue: b,
            clear,
        } = *sample;

        let lo = r.min(g).min(b);
        let hi = r.max(g).max(b);
        let diff = hi - lo;

        let value = hi;
        let saturation = if value == 0 { 0 } else { diff };

        let hue = if diff == 0 {
            0
        } else {
            // Red-max region sits at offset 0° (encoded 3600 so the sum stays
            // non-negative before the modulo), green at 120°, blue at 240°.
            let (offset, spread) = if r == hi {
                (3600, i32::from(g) - i32::from(b))
            } else if g == hi {
                (1200, i32::from(b) - i32::from(r))
            } else {
                (2400, i32::from(r) - i32::from(g))
            };
            ((offset + 600 * spread / i32::from(diff)) % 3600) as u16
        };

        Self {
            hue,
            saturation,
            value,
            clear,
        }
    }
}

/// L1 distance between two descriptors.
///
/// Plain component-wise absolute differences over {hue, saturation, value,
/// clear}, with no weighting and no hue wraparound: two near-identical hues
/// straddling the 0° boundary appear maximally distant. Intentional.
pub fn distance(a: &ColorDescriptor, b: &ColorDescriptor) -> u32 {
    u32::from(a.hue.abs_diff(b.hue))
        + u32::from(a.saturation.abs_diff(b.saturation))
        + u32::from(a.value.abs_diff(b.value))
        + u32::from(a.clear.abs_diff(b.clear))
}

/// The closed set of wall colours the buggy can meet.
///
/// Variant order matches the calibration order; `Black` is itself a calibrated
/// reference ("no colour"), so classification over a full set is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WallColor {
    Red = 0,
    Green,
    Blue,
    Yellow,
    Pink,
    Orange,
    LightBlue,
    White,
    Black,
}

impl WallColor {
    /// All reference colours in calibration order
    pub const ALL: [WallColor; COLOR_COUNT] = [
        WallColor::Red,
        WallColor::Green,
        WallColor::Blue,
        WallColor::Yellow,
        WallColor::Pink,
        WallColor::Orange,
        WallColor::LightBlue,
        WallColor::White,
        WallColor::Black,
    ];

    /// Calibration slot of this colour
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The nine reference descriptors captured by the operator calibration run.
///
/// Read-only during navigation; a full set must exist before any
/// classification is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibrationSet {
    entries: [ColorDescriptor; COLOR_COUNT],
}

impl CalibrationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the reference descriptor for one colour
    pub fn set(&mut self, color: WallColor, descriptor: ColorDescriptor) {
        self.entries[color.index()] = descriptor;
    }

    /// Reference descriptor for one colour
    pub fn get(&self, color: WallColor) -> &ColorDescriptor {
        &self.entries[color.index()]
    }
}

/// Classifies a raw sample against the calibration set.
pub fn classify(sample: &ColorSample, calibration: &CalibrationSet) -> Option<WallColor> {
    classify_descriptor(&ColorDescriptor::from_sample(sample), calibration)
}

/// Nearest-neighbour scan over the nine references.
///
/// Linear scan keeping the minimum distance below [`CLASSIFY_SENTINEL`];
/// ties break to the first match (strictly-less comparison). `None` only
/// when every reference is beyond the sentinel.
pub fn classify_descriptor(
    descriptor: &ColorDescriptor,
    calibration: &CalibrationSet,
) -> Option<WallColor> {
    let mut best = None;
    let mut best_distance = CLASSIFY_SENTINEL;

    for color in WallColor::ALL {
        let d = distance(descriptor, calibration.get(color));
        if d < best_distance {
            best_distance = d;
            best = Some(color);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(red: u16, green: u16, blue: u16, clear: u16) -> ColorSample {
        ColorSample {
            red,
            green,
            blue,
            clear,
        }
    }

    #[test]
    fn equal_channels_give_zero_hue_and_saturation() {
        for level in [0u16, 1, 127, 4096, u16::MAX] {
            let d = ColorDescriptor::from_sample(&sample(level, level, level, 42));
            assert_eq!(d.hue, 0);
            assert_eq!(d.saturation, 0);
            assert_eq!(d.value, level);
            assert_eq!(d.clear, 42);
        }
    }

    #[test]
    fn primary_channels_land_in_their_hue_region() {
        let red = ColorDescriptor::from_sample(&sample(1000, 0, 0, 0));
        assert_eq!(red.hue, 0);
        assert_eq!(red.saturation, 1000);
        assert_eq!(red.value, 1000);

        let green = ColorDescriptor::from_sample(&sample(0, 1000, 0, 0));
        assert_eq!(green.hue, 1200);

        let blue = ColorDescriptor::from_sample(&sample(0, 0, 1000, 0));
        assert_eq!(blue.hue, 2400);
    }

    #[test]
    fn red_region_wraps_below_zero_degrees() {
        // Red max with blue above green: negative spread, hue just under 3600.
        let d = ColorDescriptor::from_sample(&sample(1000, 0, 500, 0));
        assert_eq!(d.hue, 3300);
        // And the symmetric case stays just above zero.
        let d = ColorDescriptor::from_sample(&sample(1000, 500, 0, 0));
        assert_eq!(d.hue, 300);
    }

    #[test]
    fn hue_division_truncates() {
        let d = ColorDescriptor::from_sample(&sample(1000, 400, 300, 0));
        // 600 * 100 / 700 = 85 (85.71.. truncated toward zero)
        assert_eq!(d.hue, 85);
    }

    #[test]
    fn distance_is_symmetric_and_zero_iff_equal() {
        let a = ColorDescriptor {
            hue: 10,
            saturation: 20,
            value: 30,
            clear: 40,
        };
        let b = ColorDescriptor {
            hue: 3599,
            saturation: 0,
            value: 65535,
            clear: 7,
        };
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert_eq!(distance(&a, &a), 0);
        assert_eq!(distance(&b, &b), 0);
        assert!(distance(&a, &b) > 0);
    }

    #[test]
    fn hue_wraparound_is_not_compensated() {
        let low = ColorDescriptor {
            hue: 1,
            ..Default::default()
        };
        let high = ColorDescriptor {
            hue: 3599,
            ..Default::default()
        };
        // Nearly identical physical hues, maximally distant in this metric.
        assert_eq!(distance(&low, &high), 3598);
    }

    fn spread_calibration() -> CalibrationSet {
        let mut cal = CalibrationSet::new();
        for color in WallColor::ALL {
            cal.set(
                color,
                ColorDescriptor {
                    clear: color.index() as u16 * 500,
                    ..Default::default()
                },
            );
        }
        cal
    }

    #[test]
    fn classify_covers_the_whole_label_set() {
        let cal = spread_calibration();
        for color in WallColor::ALL {
            let got = classify_descriptor(cal.get(color), &cal);
            assert_eq!(got, Some(color));
        }
    }

    #[test]
    fn classify_matches_a_raw_sample_to_its_calibrated_reference() {
        let mut cal = CalibrationSet::new();
        let green_wall = sample(200, 1400, 300, 900);
        cal.set(WallColor::Green, ColorDescriptor::from_sample(&green_wall));
        cal.set(
            WallColor::Black,
            ColorDescriptor {
                clear: 30_000,
                ..Default::default()
            },
        );
        // A slightly noisier reading of the same wall still lands on it.
        assert_eq!(
            classify(&sample(210, 1380, 310, 905), &cal),
            Some(WallColor::Green)
        );
    }

    #[test]
    fn classify_ties_break_to_the_first_reference() {
        let mut cal = CalibrationSet::new();
        // Red and Green calibrated identically: a sample matching both must
        // resolve to Red, the earlier slot.
        let shared = ColorDescriptor {
            hue: 100,
            saturation: 50,
            value: 200,
            clear: 300,
        };
        cal.set(WallColor::Red, shared);
        cal.set(WallColor::Green, shared);
        cal.set(
            WallColor::Black,
            ColorDescriptor {
                clear: 30_000,
                ..Default::default()
            },
        );
        assert_eq!(classify_descriptor(&shared, &cal), Some(WallColor::Red));
    }

    #[test]
    fn classify_rejects_everything_beyond_the_sentinel() {
        let mut cal = CalibrationSet::new();
        for color in WallColor::ALL {
            cal.set(
                color,
                ColorDescriptor {
                    value: 40_000,
                    clear: 40_000,
                    ..Default::default()
                },
            );
        }
        let dark = ColorDescriptor::default();
        assert_eq!(classify_descriptor(&dark, &cal), None);
    }
}
