//! Caption prompt compilation.
//!
//! Builds the copywriter system instruction and the per-platform user prompt.
//! Everything here is a pure function of its inputs: no I/O, no clock, no
//! randomness, so the same request always produces the same prompt text.
//!
//! ## Prompt layout
//!
//! ```text
//! Buat 3 variasi caption untuk <platform> (<word band>).
//! Gaya bahasa: <tone>.
//! Produk: <name> (<category>), harga <Rp ...>.
//! Manfaat utama: <benefits>.
//! Audiens: <audience>.
//! Brand/Toko: <shop> di alamat <address>.
//! Gunakan struktur: Hook singkat → Manfaat → Harga/Promo → CTA.
//! Sertakan CTA: "Chat WhatsApp" dengan tautan <wa.me link>.   (only with contact + flag)
//! Hashtag lokal relevan <n> buah. Kembalikan dalam JSON array berisi objek {caption, hashtags}.
//! ```

use crate::locale::{encode_uri_component, format_idr};
use crate::platform::{self, PlatformGuide};
use crate::types::{Product, Shop};

/// Persona and house rules sent as the system message for every caption call.
pub const SYSTEM_COPYWRITER: &str = "Kamu adalah copywriter UMKM Indonesia. Tulis dalam bahasa Indonesia yang natural.\n\
Patuhi aturan: hindari klaim medis, jangan berlebihan, gunakan CTA jelas, masukkan nomor/tautan WhatsApp jika disediakan.";

pub const DEFAULT_TONE: &str = "Kasual & Ramah";

/// Number of caption variants requested per platform.
pub const VARIANTS_PER_PLATFORM: u32 = 3;

/// Inputs for one platform's prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub product: &'a Product,
    pub shop: &'a Shop,
    pub tone: &'a str,
    pub platform: &'a str,
    pub wants_whatsapp_cta: bool,
}

/// `https://wa.me/<digits>?text=<greeting>` for the shop, if it has a WhatsApp number.
///
/// The greeting is pre-filled so the customer only has to press send.
pub fn whatsapp_link(product: &Product, shop: &Shop) -> Option<String> {
    let digits = shop.whatsapp_digits()?;
    let greeting = format!(
        "Halo {}, saya mau pesan {}",
        shop.name.as_deref().unwrap_or(""),
        product.name.as_deref().unwrap_or("")
    );
    Some(format!(
        "https://wa.me/{digits}?text={}",
        encode_uri_component(&greeting)
    ))
}

/// Compile the user prompt for one platform.
pub fn compile(input: &PromptInput<'_>) -> String {
    let guide: &PlatformGuide = platform::guide_for(input.platform);
    let product = input.product;
    let shop = input.shop;
    let or_dash = |v: &Option<String>| -> String {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("-")
            .to_string()
    };

    let mut lines = vec![
        format!(
            "Buat {VARIANTS_PER_PLATFORM} variasi caption untuk {} ({}).",
            guide.name, guide.words
        ),
        format!("Gaya bahasa: {}.", input.tone),
        format!(
            "Produk: {} ({}), harga {}.",
            product.name.as_deref().unwrap_or(""),
            or_dash(&product.category),
            format_idr(product.price_value())
        ),
        format!("Manfaat utama: {}.", or_dash(&product.benefits)),
        format!("Audiens: {}.", or_dash(&product.audience)),
        format!(
            "Brand/Toko: {} di alamat {}.",
            or_dash(&shop.name),
            or_dash(&shop.address)
        ),
        "Gunakan struktur: Hook singkat → Manfaat → Harga/Promo → CTA.".to_string(),
    ];

    if input.wants_whatsapp_cta
        && let Some(link) = whatsapp_link(product, shop)
    {
        lines.push(format!(
            "Sertakan CTA: \"Chat WhatsApp\" dengan tautan {link}."
        ));
    }

    lines.push(format!(
        "Hashtag lokal relevan {} buah. Kembalikan dalam JSON array berisi objek {{caption, hashtags}}.",
        guide.hashtags
    ));

    let mut prompt = lines.join("\n");
    prompt.push('\n');
    prompt
}
