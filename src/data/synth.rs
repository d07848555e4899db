//! Seeded synthetic applicant generator.
//!
//! Produces a label-balanced dataset with a learnable signal (education and
//! experience dominate, zone and gender nudge). No attempt is made at
//! statistical realism.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::domain::{Education, Gender, RawRecord, Zone};

const GENDERS: [Gender; 2] = [Gender::M, Gender::F];
const ZONES: [Zone; 3] = [Zone::Center, Zone::Periphery, Zone::Suburb];
const EDUCATIONS: [Education; 4] = [
    Education::Nothing,
    Education::HighSchool,
    Education::Degree,
    Education::Master,
];

fn zone_income(zone: Zone) -> f64 {
    match zone {
        Zone::Center => 200.0,
        Zone::Periphery => 0.0,
        Zone::Suburb => -100.0,
    }
}

fn education_income(education: Education) -> f64 {
    match education {
        Education::Nothing => -200.0,
        Education::HighSchool => 300.0,
        Education::Degree => 700.0,
        Education::Master => 1200.0,
    }
}

fn hiring_score(rec: &RawRecord) -> f64 {
    let mut score = 0.05 * ((rec.age - 18).clamp(0, 40) as f64)
        + 0.08 * rec.experience as f64
        + 0.0004 * rec.income;
    score += match rec.education {
        Education::Nothing => -5.0,
        Education::HighSchool => 3.0,
        Education::Degree => 7.0,
        Education::Master => 9.0,
    };
    score += match rec.zone {
        Zone::Center => 3.0,
        Zone::Periphery => 0.0,
        Zone::Suburb => -2.0,
    };
    if rec.gender == Gender::F {
        score -= 1.5;
    }
    score
}

fn draw_applicant(rng: &mut ChaCha8Rng) -> RawRecord {
    let age: i64 = rng.gen_range(18..65);
    let experience = rng.gen_range(0..=(age - 18) / 2);
    let gender = GENDERS[rng.gen_range(0..GENDERS.len())];
    let zone = ZONES[rng.gen_range(0..ZONES.len())];
    let education = EDUCATIONS[rng.gen_range(0..EDUCATIONS.len())];

    let income = 600.0
        + experience as f64 * rng.gen_range(80.0..150.0)
        + zone_income(zone)
        + education_income(education)
        + rng.gen_range(-300.0..300.0);

    let mut rec = RawRecord {
        age,
        gender,
        income: income.clamp(400.0, 8000.0).round(),
        experience,
        zone,
        education,
        hired: None,
    };

    let noisy = hiring_score(&rec) + rng.gen_range(-4.0..4.0);
    let p = 1.0 / (1.0 + (-0.35 * (noisy - 5.0)).exp());
    rec.hired = Some(rng.gen_bool(p.clamp(0.0, 1.0)));
    rec
}

/// Generate exactly `n` labelled applicants, half hired, deterministically from `seed`.
///
/// If the raw draw happens to contain only one class the records are returned
/// unbalanced.
pub fn generate(n: usize, seed: u64) -> Vec<RawRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let raw: Vec<RawRecord> = (0..n).map(|_| draw_applicant(&mut rng)).collect();

    let (yes, no): (Vec<RawRecord>, Vec<RawRecord>) =
        raw.iter().cloned().partition(|r| r.hired == Some(true));
    if yes.is_empty() || no.is_empty() {
        return raw;
    }

    let negatives = n / 2;
    let positives = n - negatives;
    let mut out = Vec::with_capacity(n);
    for _ in 0..positives {
        out.push(yes[rng.gen_range(0..yes.len())].clone());
    }
    for _ in 0..negatives {
        out.push(no[rng.gen_range(0..no.len())].clone());
    }
    out.shuffle(&mut rng);
    out
}
