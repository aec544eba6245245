//! WASM bindings for KSeF invoice visualization.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use wasm_bindgen::prelude::*;

use ksef_core::models::config::KsefConfig;
use ksef_core::{DocumentRenderer, InvoiceExtractor, InvoiceRenderer, KsefXmlParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Extract the normalized invoice from KSeF XML.
#[wasm_bindgen]
pub fn extract_invoice(xml: &str) -> Result<JsValue, JsValue> {
    InvoiceConverter::new()?.extract(xml)
}

/// Render KSeF XML to PDF bytes.
#[wasm_bindgen]
pub fn render_invoice_pdf(xml: &str) -> Result<Vec<u8>, JsValue> {
    ksef_core::convert(xml).map_err(to_js_error)
}

/// Format an amount string as "1 234.56"; unparsable input formats as "0.00".
#[wasm_bindgen]
pub fn format_amount(amount: &str) -> String {
    ksef_core::render::format_raw_amount(Some(amount))
}

/// Label for a payment method code; unknown codes are returned unchanged.
#[wasm_bindgen]
pub fn payment_method_label(code: &str) -> String {
    ksef_core::payment_method_label(code).to_string()
}

/// Invoice converter class for browser use, with its own configuration.
#[wasm_bindgen]
pub struct InvoiceConverter {
    parser: KsefXmlParser,
    renderer: InvoiceRenderer,
}

#[wasm_bindgen]
impl InvoiceConverter {
    /// Create a converter with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<InvoiceConverter, JsValue> {
        Self::from_config(KsefConfig::default())
    }

    /// Create a converter from a JSON configuration; missing keys keep
    /// their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<InvoiceConverter, JsValue> {
        let config: KsefConfig = serde_json::from_str(config_json).map_err(to_js_error)?;
        Self::from_config(config)
    }

    /// Extract the normalized invoice.
    #[wasm_bindgen]
    pub fn extract(&self, xml: &str) -> Result<JsValue, JsValue> {
        let invoice = self.parser.extract(xml).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&invoice).map_err(to_js_error)
    }

    /// Render to PDF bytes.
    #[wasm_bindgen]
    pub fn render(&self, xml: &str) -> Result<js_sys::Uint8Array, JsValue> {
        let invoice = self.parser.extract(xml).map_err(to_js_error)?;
        let pdf = self.renderer.render(&invoice).map_err(to_js_error)?;
        Ok(js_sys::Uint8Array::from(pdf.as_slice()))
    }

    /// Number of pages the invoice lays out to.
    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self, xml: &str) -> Result<usize, JsValue> {
        let invoice = self.parser.extract(xml).map_err(to_js_error)?;
        Ok(self.renderer.layout(&invoice).page_count())
    }
}

impl InvoiceConverter {
    fn from_config(config: KsefConfig) -> Result<Self, JsValue> {
        Ok(Self {
            parser: KsefXmlParser::with_config(config.extraction),
            renderer: InvoiceRenderer::with_config(config.render).map_err(to_js_error)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const XML: &str = r#"<Faktura xmlns="http://crd.gov.pl/wzor/2025/06/25/13775/">
  <Fa><P_2>FV/1</P_2><P_13_1>100</P_13_1><P_14_1>23</P_14_1><P_15>123</P_15></Fa>
</Faktura>"#;

    #[wasm_bindgen_test]
    fn test_format_amount() {
        assert_eq!(format_amount("1234.5"), "1 234.50");
        assert_eq!(format_amount("abc"), "0.00");
    }

    #[wasm_bindgen_test]
    fn test_payment_method_label() {
        assert_eq!(payment_method_label("6"), "przelew");
        assert_eq!(payment_method_label("9"), "9");
    }

    #[wasm_bindgen_test]
    fn test_render_invoice_pdf() {
        let pdf = render_invoice_pdf(XML).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[wasm_bindgen_test]
    fn test_unknown_schema_is_an_error() {
        let xml = XML.replace("13775", "99999");
        assert!(render_invoice_pdf(&xml).is_err());
    }

    #[wasm_bindgen_test]
    fn test_render_keeps_foreign_letters() {
        let xml = XML.replace("<P_2>FV/1</P_2>", "<P_2>FV/1</P_2><P_1M>Brno Škoda Dvořák</P_1M>");
        let converter = InvoiceConverter::new().unwrap();
        assert_eq!(converter.page_count(&xml).unwrap(), 1);
        assert!(converter.render(&xml).unwrap().length() > 0);
    }

    #[wasm_bindgen_test]
    fn test_converter_with_config() {
        let converter =
            InvoiceConverter::with_config(r#"{"render": {"watermark": "ACME"}}"#).unwrap();
        assert_eq!(converter.page_count(XML).unwrap(), 1);
    }
}
