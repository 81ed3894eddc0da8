mod utils;

use criterion::{criterion_group, criterion_main, Criterion};
use sacabwt::SuffixArray;
use utils::*;

macro_rules! search_method_bench {
    ($name:ident, $label:expr, $method:ident) => {
        fn $name(crit: &mut Criterion) {
            let dir = env!("CARGO_MANIFEST_DIR").to_owned() + "/benches/data";
            eprintln!("preparing data in {}...", dir);
            let (samples, patterns) = make_data(dir.as_ref()).unwrap();

            for sname in samples.into_iter() {
                eprint!("loading sample {}...", sname);
                let sdata;
                if let Ok(tmp) = load_data(dir.as_ref(), sname) {
                    sdata = tmp;
                    eprintln!("yes");
                } else {
                    eprintln!("pass");
                    continue;
                }
                let slen = sdata.len();

                eprintln!("constructing sa...");
                let mut sa = SuffixArray::new(&sdata[..]);
                sa.enable_buckets();

                for &pname in patterns.iter() {
                    eprint!("loading pattern {}...", pname);
                    let pdata;
                    if let Ok(tmp) = load_pattern(dir.as_ref(), sname, pname) {
                        pdata = tmp;
                        eprintln!("yes");
                    } else {
                        eprintln!("pass");
                        continue;
                    }
                    let plen = pdata.len();

                    let bench_name = format!("{} {}~{}", $label, sname, pname);

                    set_criterion_samples(crit, calc_samples(slen, plen));

                    crit.bench_function(bench_name.as_ref(), |b| {
                        b.iter(|| {
                            sa.$method(&pdata[..]);
                        })
                    });
                }
            }
        }
    };
}

fn calc_samples(slen: usize, plen: usize) -> usize {
    if slen <= 4096 {
        1000
    } else if slen <= 1024 * 1024 {
        100
    } else if plen <= 4096 {
        50
    } else {
        10
    }
}

search_method_bench!(sa_contains, "contains", contains);
search_method_bench!(sa_search_all, "search_all", search_all);
search_method_bench!(sa_search_lcp, "search_lcp", search_lcp);

criterion_group!(sa_search_benches, sa_contains, sa_search_all, sa_search_lcp);
criterion_main!(sa_search_benches);
