#![allow(dead_code)]

use self::DataLength::*;
use self::PatternLength::*;
use criterion::Criterion;
use rand::distributions::Uniform;
use rand::{thread_rng, Rng};
use std::fs;
use std::io::{Error, ErrorKind, Read, Result, Write};
use std::path::PathBuf;
use sacabwt::MAX_LENGTH;

const SEPARATOR: &str = "~";

static RANDOM_DATA_STATS: &[(&str, u8, usize)] = &[
    ("qua-128b", 4, 128),
    ("txt-128b", 127, 128),
    ("bin-128b", 255, 128),
    ("qua-4k", 4, 4096),
    ("txt-4k", 127, 4096),
    ("bin-4k", 255, 4096),
    ("qua-64k", 4, 65536),
    ("txt-64k", 127, 65536),
    ("bin-64k", 255, 65536),
    ("qua-1m", 4, 1048576),
    ("txt-1m", 127, 1048576),
    ("bin-1m", 255, 1048576),
];

static PATTERN_SCHEMES: &[(&str, DataLength, PatternLength, PatternLength)] = &[
    ("select-8b", Unlimited, Fixed(8), Fixed(0)),
    ("hybrid-8b", Till(1048576), Fixed(8), Fixed(4)),
    ("random-8b", Till(65536), Fixed(8), Fixed(8)),
    ("select-128b", Ranged(4096, 1048576), Fixed(128), Fixed(0)),
    ("hybrid-128b", Ranged(4096, 1048576), Fixed(128), Fixed(64)),
    ("random-128b", Ranged(4096, 1048576), Fixed(128), Fixed(128)),
];

#[derive(Clone, Copy)]
enum DataLength {
    Unlimited,
    Till(usize),
    Ranged(usize, usize),
}

impl DataLength {
    pub fn contains(&self, dlen: usize) -> bool {
        match self {
            &Unlimited => true,
            &Till(x) => dlen <= x,
            &Ranged(x, y) => dlen >= x && dlen <= y,
        }
    }
}

#[derive(Clone, Copy)]
enum PatternLength {
    Fixed(usize),
    Ratio(f64),
}

impl PatternLength {
    pub fn calculate(&self, accord: usize) -> usize {
        match self {
            &Fixed(n) => Ord::min(accord, n),
            &Ratio(mut r) => {
                if r > 1.0 {
                    r = 1.0;
                }
                if r < 0.0 {
                    r = 0.0;
                }
                let n = (r * accord as f64) as usize;
                Ord::min(accord, n)
            }
        }
    }
}

pub fn load_data(dir: &str, name: &str) -> Result<Vec<u8>> {
    let fpath = PathBuf::from(dir).join(name);
    let flen = fs::metadata(&fpath)?.len();
    if flen > MAX_LENGTH as u64 {
        return Err(Error::new(ErrorKind::Other, "file too long"));
    }

    let mut file = fs::File::open(fpath)?;
    let mut data = Vec::with_capacity(flen as usize);
    file.read_to_end(&mut data)?;
    Ok(data)
}

pub fn load_pattern(dir: &str, name: &str, pattern: &str) -> Result<Vec<u8>> {
    let full_name = String::from(name) + SEPARATOR + pattern;
    load_data(dir, full_name.as_ref())
}

/// Generates a local corpus of random samples and search patterns under
/// `dir`, caching each file across runs. No network access: this replaces
/// the upstream Pizza&Chili corpus download with synthetic data of the
/// same length classes.
pub fn make_data(dir: &str) -> Result<(Vec<&'static str>, Vec<&'static str>)> {
    let mut samples = Vec::new();
    let mut patterns = Vec::new();

    if fs::metadata(dir).is_err() {
        fs::create_dir_all(dir)?;
    }

    for &(name, scale, mut length) in RANDOM_DATA_STATS.iter() {
        let fpath = PathBuf::from(dir).join(name);
        if fs::metadata(&fpath).is_err() {
            eprintln!("generating sample {}", name);
            let mut file = fs::File::create(&fpath)?;
            let mut buf = vec![0; 4096];
            while length > 0 {
                let n = Ord::min(length, buf.len());
                random_bytes(scale, &mut buf[..n]);
                file.write_all(&buf[..n])?;
                length -= n;
            }
        }
        samples.push(name);
    }

    for &(name, _, _, _) in PATTERN_SCHEMES.iter() {
        patterns.push(name);
    }

    for &sname in samples.iter() {
        let sdata = load_data(dir, sname)?;
        for &(pname, dlen, plen, jlen) in PATTERN_SCHEMES.iter() {
            if !dlen.contains(sdata.len()) {
                continue;
            }

            let full_name = String::from(sname) + SEPARATOR + pname;
            let fpath = PathBuf::from(dir).join(full_name);
            if fs::metadata(&fpath).is_err() {
                eprintln!("generating pattern {}~{}", sname, pname);
                let mut file = fs::File::create(fpath)?;
                let total = plen.calculate(sdata.len());
                let b = jlen.calculate(total);
                let a = total - b;

                let mut pdata = Vec::with_capacity(total);
                pdata.extend_from_slice(random_select(a, &sdata[..]));
                let mut rng = thread_rng();
                for _ in 0..b {
                    pdata.push(rng.gen::<u8>());
                }
                file.write_all(&pdata[..])?;
            }
        }
    }

    Ok((samples, patterns))
}

fn random_bytes(scale: u8, buf: &mut [u8]) {
    let uni = Uniform::from(0..=scale);
    let mut rng = thread_rng();
    buf.iter_mut().for_each(|c| *c = rng.sample(uni));
}

fn random_select(len: usize, buf: &[u8]) -> &[u8] {
    if len == 0 || buf.len() <= len {
        return &buf[..len.min(buf.len())];
    }
    let uni = Uniform::from(0..=buf.len() - len);
    let mut rng = thread_rng();
    let i = rng.sample(uni);
    &buf[i..i + len]
}

pub fn set_criterion_samples(crit: &mut Criterion, mut n: usize) {
    if n < 2 {
        n = 2;
    }
    let tmp = std::mem::replace(crit, Criterion::default());
    let _ = std::mem::replace(crit, tmp.sample_size(n));
}
