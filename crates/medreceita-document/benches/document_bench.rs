// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the medreceita-document crate: logo background
// removal and full prescription PDF output.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use medreceita_core::{BuyerInfo, DoctorInfo, PrescriptionData, PrescriptionStyle, PrescriptionType};
use medreceita_document::{PdfWriter, remove_background, render};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Background removal on a 512x512 logo: white canvas with a dark square.
fn bench_remove_background(c: &mut Criterion) {
    let mut img = RgbaImage::from_pixel(512, 512, Rgba([250, 250, 250, 255]));
    for y in 128..384 {
        for x in 128..384 {
            img.put_pixel(x, y, Rgba([20, 60, 140, 255]));
        }
    }

    c.bench_function("remove_background (512x512)", |b| {
        b.iter(|| {
            let out = remove_background(black_box(&img), 240).expect("non-empty image");
            black_box(out);
        });
    });
}

/// Layout plus PDF serialisation of the dual-copy prescription.
fn bench_special_pdf(c: &mut Criterion) {
    let doctor = DoctorInfo::default();
    let data = PrescriptionData::default().with_prescription("Clonazepam 2mg\n1 comprimido à noite");
    let style = PrescriptionStyle::default();
    let buyer = BuyerInfo::default();
    let writer = PdfWriter::new();

    c.bench_function("special prescription pdf", |b| {
        b.iter(|| {
            let doc = render(PrescriptionType::Special, &doctor, &data, &style, Some(&buyer));
            black_box(writer.render(black_box(&doc)).expect("pdf renders"));
        });
    });
}

criterion_group!(benches, bench_remove_background, bench_special_pdf);
criterion_main!(benches);
