// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::{thread_rng, Rng};

use bignum::{BigNum, Context};

fn bench_mul(cx: &Context, a: &BigNum, b: &BigNum, bench: &mut Bencher) {
    bench.iter(|| cx.mul(a, b).unwrap())
}

fn bench_div(cx: &Context, a: &BigNum, b: &BigNum, bench: &mut Bencher) {
    bench.iter(|| cx.div(a, b).unwrap())
}

pub fn bench_arith(c: &mut Criterion) {
    let mut rng = thread_rng();
    let cx = Context::default();
    let a = BigNum::from(rng.gen::<i64>());
    let b = BigNum::from(rng.gen::<i64>().max(1));

    c.bench_function("mul_i64_operands", |bench| bench_mul(&cx, &a, &b, bench));
    c.bench_function("div_i64_operands", |bench| bench_div(&cx, &a, &b, bench));

    let cx = Context::with_precision(1000).unwrap();
    let two = cx.parse_with_precision("2", 1000).unwrap();
    c.bench_function("sqrt_1000_digits", |bench| {
        bench.iter(|| cx.sqrt(&two).unwrap())
    });
}

pub fn bench_format(c: &mut Criterion) {
    let cx = Context::with_precision(100).unwrap();
    let pi = cx.pi().unwrap();
    c.bench_function("format_100_digits", |bench| bench.iter(|| pi.to_string()));
    let s = pi.to_string();
    c.bench_function("parse_100_digits", |bench| {
        bench.iter(|| s.parse::<BigNum>().unwrap())
    });
}

criterion_group!(benches, bench_arith, bench_format);
criterion_main!(benches);
