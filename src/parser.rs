use anyhow::{anyhow, Context, Result};
use scraper::{ElementRef, Html, Selector};

use crate::models::VehicleRecord;

const TITLE_SELECTOR: &str = "h1.vehicle-details__title";

/// Extracts a vehicle record from a listing page.
///
/// The title must be present and split into year, make and model; the Trim
/// and VIN fields fall back to `"N/A"` when their label is not on the page.
pub fn parse_vehicle_page(html: &str, url: &str) -> Result<VehicleRecord> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?;
    let (year, make, model) = split_title(&title)?;

    let trim = labeled_value(&document, "Trim:")?.unwrap_or_else(|| "N/A".to_string());
    let vin = labeled_value(&document, "VIN:")?.unwrap_or_else(|| "N/A".to_string());

    Ok(VehicleRecord {
        year,
        make,
        model,
        trim,
        vin,
        url: url.to_string(),
    })
}

fn extract_title(document: &Html) -> Result<String> {
    let selector = parse_selector(TITLE_SELECTOR)?;

    let element = document
        .select(&selector)
        .next()
        .context("Title element not found")?;

    Ok(element_text(&element))
}

/// Splits a listing title on its first two spaces: year, make, and the rest
/// of the line as the model.
fn split_title(title: &str) -> Result<(String, String, String)> {
    let mut parts = title.splitn(3, ' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(make), Some(model)) => {
            Ok((year.to_string(), make.to_string(), model.to_string()))
        }
        _ => Err(anyhow!(
            "Title {:?} does not split into year, make and model",
            title
        )),
    }
}

/// Looks up a `<span>` whose text is exactly `label` and returns the text of
/// the element following it.
///
/// `Ok(None)` when the page has no such label; an error when the label is
/// there but no element follows it. All page-layout knowledge for labeled
/// fields sits here, so a markup change is fixed in one place.
fn labeled_value(document: &Html, label: &str) -> Result<Option<String>> {
    let selector = parse_selector("span")?;

    let label_element = match document.select(&selector).find(|e| element_text(e) == label) {
        Some(element) => element,
        None => return Ok(None),
    };

    let value = label_element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .with_context(|| format!("Label {:?} has no value element after it", label))?;

    Ok(Some(element_text(&value)))
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| anyhow!("Failed to parse selector {:?}: {:?}", selector, e))
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.clutch.ca/vehicles/12345";

    fn page(body: &str) -> String {
        format!("<html><body>{}</body></html>", body)
    }

    #[test]
    fn extracts_record_with_trim_and_vin() {
        let html = page(
            r#"<h1 class="vehicle-details__title">2020 Toyota Corolla LE</h1>
               <div>
                 <span>Trim:</span><span>LE</span>
                 <span>VIN:</span><span>1HGCM82633A004352</span>
               </div>"#,
        );

        let record = parse_vehicle_page(&html, URL).unwrap();
        assert_eq!(record.year, "2020");
        assert_eq!(record.make, "Toyota");
        assert_eq!(record.model, "Corolla LE");
        assert_eq!(record.trim, "LE");
        assert_eq!(record.vin, "1HGCM82633A004352");
        assert_eq!(record.url, URL);
    }

    #[test]
    fn missing_labels_default_to_na() {
        let html = page(r#"<h1 class="vehicle-details__title">2020 Toyota Corolla LE</h1>"#);

        let record = parse_vehicle_page(&html, URL).unwrap();
        assert_eq!(record.trim, "N/A");
        assert_eq!(record.vin, "N/A");
    }

    #[test]
    fn model_keeps_everything_after_the_second_space() {
        let html = page(
            r#"<h1 class="vehicle-details__title">2021 Land Rover Range Rover Sport</h1>"#,
        );

        let record = parse_vehicle_page(&html, URL).unwrap();
        assert_eq!(record.year, "2021");
        assert_eq!(record.make, "Land");
        assert_eq!(record.model, "Rover Range Rover Sport");
    }

    #[test]
    fn short_title_fails_extraction() {
        let html = page(r#"<h1 class="vehicle-details__title">2020 Toyota</h1>"#);
        assert!(parse_vehicle_page(&html, URL).is_err());
    }

    #[test]
    fn missing_title_fails_extraction() {
        let html = page(r#"<h1 class="other-heading">2020 Toyota Corolla LE</h1>"#);
        assert!(parse_vehicle_page(&html, URL).is_err());
    }

    #[test]
    fn label_without_value_element_fails_extraction() {
        let html = page(
            r#"<h1 class="vehicle-details__title">2020 Toyota Corolla LE</h1>
               <div><span>Trim:</span></div>"#,
        );
        assert!(parse_vehicle_page(&html, URL).is_err());
    }

    #[test]
    fn value_spans_are_not_mistaken_for_labels() {
        // "VIN:" only matches its own label span, not the Trim value before it.
        let html = page(
            r#"<h1 class="vehicle-details__title">2019 Honda Civic</h1>
               <div><span>Trim:</span><span>Touring</span></div>
               <div><span>VIN:</span><span>2HGFC1F91KH000001</span></div>"#,
        );

        let record = parse_vehicle_page(&html, URL).unwrap();
        assert_eq!(record.trim, "Touring");
        assert_eq!(record.vin, "2HGFC1F91KH000001");
    }
}
