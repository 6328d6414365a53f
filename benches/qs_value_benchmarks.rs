use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct SimpleStruct {
    id: u32,
    name: String,
    active: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Address {
    city: String,
    street: String,
    postcode: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct QueryParams {
    id: u8,
    name: String,
    phone: u32,
    address: Address,
    user_ids: Vec<u8>,
}

// Parsing benchmarks
fn parse_flat(c: &mut Criterion) {
    let query = "id=42&name=test_user&active=true";

    c.bench_function("parse_flat", |b| {
        b.iter(|| qs_value::parse(black_box(query)))
    });
}

fn parse_nested(c: &mut Criterion) {
    let query = "id=42&name=Acme&phone=12345&address[city]=Carrot+City&\
                 address[street]=Special-Street*+No.+11&address[postcode]=12345&\
                 user_ids[0]=1&user_ids[1]=2&user_ids[2]=3&user_ids[3]=4";

    c.bench_function("parse_nested", |b| {
        b.iter(|| qs_value::parse(black_box(query)))
    });
}

fn parse_encoded(c: &mut Criterion) {
    let query = "name=%E4%BD%A0%E5%A5%BD&address%5Bcity%5D=Carrot+City&\
                 note=100%25+sure%21&tags%5B%5D=a%26b&tags%5B%5D=c%3Dd";

    c.bench_function("parse_encoded", |b| {
        b.iter(|| qs_value::parse(black_box(query)))
    });
}

fn parse_large_append(c: &mut Criterion) {
    let query: String = (0..1_000).map(|i| format!("items[]={i}&")).collect();

    c.bench_function("parse_large_append", |b| {
        b.iter(|| qs_value::parse(black_box(&query)))
    });
}

fn parse_large_indexed(c: &mut Criterion) {
    // reverse order so normalization has to sort
    let query: String = (0..1_000).rev().map(|i| format!("rows[{i}][id]={i}&")).collect();

    c.bench_function("parse_large_indexed", |b| {
        b.iter(|| qs_value::parse(black_box(&query)))
    });
}

// Deserialization benchmarks
fn deserialize_simple_struct(c: &mut Criterion) {
    let query = "id=42&name=test_user&active=true";

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| qs_value::from_str::<SimpleStruct>(black_box(query)).unwrap())
    });
}

fn deserialize_nested_struct(c: &mut Criterion) {
    let query = "id=42&name=Acme&phone=12345&address[city]=Carrot+City&\
                 address[street]=Special-Street*+No.+11&address[postcode]=12345&\
                 user_ids[]=1&user_ids[]=2&user_ids[]=3&user_ids[]=4";

    c.bench_function("deserialize_nested_struct", |b| {
        b.iter(|| qs_value::from_str::<QueryParams>(black_box(query)).unwrap())
    });
}

criterion_group!(
    parse,
    parse_flat,
    parse_nested,
    parse_encoded,
    parse_large_append,
    parse_large_indexed
);

criterion_group!(
    deserialize,
    deserialize_simple_struct,
    deserialize_nested_struct
);

criterion_main!(parse, deserialize);
