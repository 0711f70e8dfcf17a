use chrono::Utc;
use floorplan_feed::feed::parser::parse_document;
use floorplan_feed::{Adapter, FacetKey, PriceRange, SearchOptions};
use pretty_assertions::assert_eq;

fn feed(date_available: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PhysicalProperty>
  <Property>
    <File id="10"><Src>https://img.example.com/a-101.png</Src></File>
    <Floorplan id="10">
      <Name>A-101</Name>
      <Room type="bedroom"><Count>1</Count></Room>
      <Room type="bathroom"><Count>1</Count></Room>
      <SquareFeet min="720" max="720"/>
      <MarketRent min="1000" max="1200"/>
    </Floorplan>
    <ILS_Unit>
      <UnitID>1101</UnitID>
      <ExtId>u1</ExtId>
      <MinSquareFeet>720</MinSquareFeet>
      <UnitBedrooms>1</UnitBedrooms>
      <UnitBathrooms>1</UnitBathrooms>
      <FloorplanID>10</FloorplanID>
      <UnitRent>1100</UnitRent>
      <ApplyOnlineURL>https://apply.example.com/u1</ApplyOnlineURL>
      <UnitAmenityList>Balcony</UnitAmenityList>
      <UnitLeasedStatusDescription>Vacant Unrented Ready</UnitLeasedStatusDescription>
      <DateAvailable>{date_available}</DateAvailable>
    </ILS_Unit>
  </Property>
</PhysicalProperty>"#
    )
}

#[test]
fn single_floorplan_end_to_end() {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let document = parse_document(&feed(&today)).unwrap();

    let adapter = Adapter::from_document(&document).unwrap();
    let floorplans = adapter.floorplans();

    assert_eq!(floorplans.keys().collect::<Vec<_>>(), ["10"]);
    let floorplan = &floorplans["10"];
    assert_eq!(floorplan.floors, "11");
    assert_eq!(floorplan.bedroom_type, "1 bedroom");
    assert_eq!(floorplan.unit_number, "101");
    assert_eq!(floorplan.description, "A-101 - 1 bedroom, 1 bathroom");

    let options = SearchOptions::new(&floorplans).unwrap();
    let expected = PriceRange {
        min_prices: vec![1000],
        max_prices: vec![1200],
    };
    assert_eq!(
        options.leaf(&FacetKey::value(1), &FacetKey::value("11")),
        Some(&expected)
    );
    assert_eq!(options.leaf(&FacetKey::All, &FacetKey::All), Some(&expected));

    assert_eq!(
        options.serialized_list(),
        r#"{"1":{"11":{"min_prices":[1000],"max_prices":[1200]},"*":{"min_prices":[1000],"max_prices":[1200]}},"*":{"11":{"min_prices":[1000],"max_prices":[1200]},"*":{"min_prices":[1000],"max_prices":[1200]}}}"#
    );
}

#[test]
fn unit_outside_lead_time_empties_the_catalog() {
    let far = (Utc::now() + chrono::Duration::days(200))
        .format("%Y-%m-%d")
        .to_string();
    let document = parse_document(&feed(&far)).unwrap();

    let adapter = Adapter::from_document(&document).unwrap();
    assert!(adapter.floorplans().is_empty());
    assert_eq!(adapter.all_floorplans().len(), 1);

    let options = SearchOptions::new(&adapter.floorplans()).unwrap();
    assert!(options.structured_list().is_empty());
}
