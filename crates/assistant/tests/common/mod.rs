//! Synthetic datasets shared by the assistant integration tests
//!
//! Each condition has one decisive column; the rest are cyclic noise that
//! covers the record defaults.

#![allow(dead_code)]

use anyhow::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use wellness_assistant::WellnessConfig;

pub const ROWS: u32 = 160;

pub fn write_diabetes(path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,\
         DiabetesPedigreeFunction,Age,Outcome"
    )?;
    for i in 0..ROWS {
        let glucose = 70 + i * 37 % 160;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            i % 9,
            glucose,
            55 + i * 11 % 50,
            i * 7 % 45,
            i * 29 % 300,
            18.5 + (i * 13 % 25) as f64,
            (i * 3 % 20) as f64 / 10.0,
            21 + i * 17 % 50,
            u8::from(glucose > 165)
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_heart(path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "age,sex,cp,trestbps,chol,fbs,restecg,thalach,exang,oldpeak,slope,ca,thal,target"
    )?;
    for i in 0..ROWS {
        let chol = 150 + i * 53 % 160;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            30 + i * 7 % 45,
            i % 2,
            i % 4,
            100 + i * 19 % 70,
            chol,
            i / 3 % 2,
            i % 3,
            100 + i * 23 % 90,
            i / 5 % 2,
            (i * 11 % 40) as f64 / 10.0,
            i / 2 % 3,
            i / 7 % 4,
            i / 4 % 4,
            u8::from(chol > 260)
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_hypertension(path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "age,sex,BMI,systolicBP,diastolicBP,cholesterol,smoking,diabetes,target"
    )?;
    for i in 0..ROWS {
        let systolic = 95 + i * 41 % 100;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            25 + i * 13 % 55,
            i % 2,
            19.0 + (i * 17 % 20) as f64,
            systolic,
            60 + i * 7 % 40,
            160 + i * 31 % 140,
            i / 3 % 2,
            i / 5 % 2,
            u8::from(systolic > 150)
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write all three datasets under `dir` with the default file names
pub fn write_datasets(dir: &Path) -> Result<()> {
    write_diabetes(&dir.join("diabetes.csv"))?;
    write_heart(&dir.join("heart.csv"))?;
    write_hypertension(&dir.join("hypertension.csv"))?;
    Ok(())
}

/// Default configuration pointed at `dir`, with a small forest
pub fn config_for(dir: &Path) -> WellnessConfig {
    let mut config = WellnessConfig::default();
    config.datasets.data_dir = dir.to_path_buf();
    config.forest.tree_count = 25;
    config
}
