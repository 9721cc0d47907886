use std::f64::consts::TAU;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A sinusoid: (frequency, amplitude, phase).
type Tone = (f64, f64, f64);

/// Unevenly spaced times: exponential gaps with the given mean.
fn uneven_times(n: usize, mean_gap: f64, rng: &mut SimpleRng) -> Vec<f64> {
    let mut t = 0.0;
    (0..n)
        .map(|_| {
            t += -mean_gap * rng.next_f64().max(1e-12).ln();
            t
        })
        .collect()
}

fn generate_series(times: &[f64], tones: &[Tone], noise_level: f64, rng: &mut SimpleRng) -> Vec<f64> {
    times
        .iter()
        .map(|&t| {
            let signal: f64 = tones
                .iter()
                .map(|&(f, amp, phase)| amp * (TAU * f * t + phase).sin())
                .sum();
            signal + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + std_dev * z
    }
}

/// `amplitude<TAB>time` rows, the batch input format.
fn write_dat(path: &Path, times: &[f64], amplitudes: &[f64]) -> Result<()> {
    let mut text = String::new();
    for (t, y) in times.iter().zip(amplitudes) {
        writeln!(text, "{y}\t{t}")?;
    }
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("input"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let series: [(&str, usize, f64, Vec<Tone>, f64); 3] = [
        ("single_tone.dat", 300, 0.8, vec![(0.25, 1.0, 0.0)], 0.2),
        ("two_tones.dat", 500, 0.5, vec![(0.12, 1.5, 0.3), (0.61, 0.6, 1.1)], 0.3),
        ("noisy.dat", 200, 1.2, vec![(0.05, 0.4, 2.0)], 1.0),
    ];

    for (name, n, mean_gap, tones, noise) in &series {
        let times = uneven_times(*n, *mean_gap, &mut rng);
        let amplitudes = generate_series(&times, tones, *noise, &mut rng);
        let path = out_dir.join(name);
        write_dat(&path, &times, &amplitudes)?;
        println!("Wrote {n} samples to {}", path.display());
    }

    // Exercises the batch's per-file failure handling.
    let broken = out_dir.join("broken.dat");
    std::fs::write(&broken, "amplitude\ttime\nnot\ta number\n")
        .with_context(|| format!("writing {}", broken.display()))?;
    println!("Wrote malformed file {}", broken.display());

    Ok(())
}
