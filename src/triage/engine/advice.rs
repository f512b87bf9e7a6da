use super::super::domain::Subtype;

const REFERRAL_THRESHOLD: u32 = 6;

/// Advisory blocks keyed by a fragment of the subtype label they apply to.
const SUBTYPE_ADVISORIES: [(&str, &[&str]); 4] = [
    (
        "TBC Paru",
        &[
            "😷 Gunakan masker saat batuk untuk mencegah penularan",
            "🏠 Tingkatkan ventilasi udara di rumah",
        ],
    ),
    (
        "TBC Kelenjar",
        &["🔬 Perlu pemeriksaan FNAB (Fine Needle Aspiration Biopsy)"],
    ),
    (
        "TBC Tulang/Sendi",
        &["🏥 Konsultasi ke dokter ortopedi dan spesialis paru"],
    ),
    (
        "Meningitis",
        &["🚑 SEGERA KE IGD - Kondisi ini darurat medis!"],
    ),
];

/// Appended to every recommendation list, in this order.
pub const CLOSING_ADVISORIES: [&str; 5] = [
    "🍎 Konsumsi makanan bergizi tinggi protein",
    "💊 JANGAN mengobati sendiri - TBC memerlukan pengobatan khusus 6-9 bulan",
    "👨‍👩‍👧 Informasikan ke keluarga untuk pemeriksaan kontak",
    "📞 Hubungi hotline TBC Kemenkes: 0812-9992-8400",
    "⚕️ Program pengobatan TBC GRATIS di seluruh Puskesmas Indonesia",
];

/// Build the advisory list: referral block, subtype blocks, then the closing block.
pub fn generate_recommendations(total_score: u32, subtypes: &[Subtype], urgency: &str) -> Vec<String> {
    let mut recommendations = Vec::new();

    if total_score >= REFERRAL_THRESHOLD {
        recommendations.push(format!("🚨 {urgency} periksakan diri ke Puskesmas/Rumah Sakit"));
        recommendations.push(
            "📋 Minta pemeriksaan dahak (BTA) atau tes cepat TB (TCM/Xpert)".to_string(),
        );
        recommendations.push("🩻 Mungkin perlu foto rontgen dada".to_string());
    }

    for (fragment, advisories) in SUBTYPE_ADVISORIES {
        if subtypes
            .iter()
            .any(|subtype| subtype.label().contains(fragment))
        {
            recommendations.extend(advisories.iter().map(|line| line.to_string()));
        }
    }

    recommendations.extend(CLOSING_ADVISORIES.iter().map(|line| line.to_string()));
    recommendations
}
