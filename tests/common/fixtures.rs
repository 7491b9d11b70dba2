/// An order message as a service would send it.
pub const ORDER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<order xmlns="urn:shop:orders" xmlns:meta="urn:shop:meta" id="4711" channel="web">
    <customer>ACME</customer>
    <created>2024-05-01T10:15:00</created>
    <items>
        <item sku="A-1" quantity="2">
            <name>Pen</name>
            <price>1.50</price>
        </item>
        <item sku="B-7" quantity="1">
            <name>Notebook</name>
            <price>4.25</price>
        </item>
    </items>
    <total>7.25</total>
    <meta:trace>3f9a-77c1</meta:trace>
</order>"#;

/// A control template for [`ORDER`] using variables, functions and matchers.
pub const ORDER_CONTROL: &str = r#"<order xmlns="urn:shop:orders" xmlns:meta="urn:shop:meta" id="${orderId}" channel="@ignore@">
    <customer>assay:upperCase('acme')</customer>
    <created>@matchesDatePattern('%Y-%m-%dT%H:%M:%S')@</created>
    <items>
        <item sku="A-1" quantity="2">
            <name>Pen</name>
            <price>@isNumber@</price>
        </item>
        <item sku="@startsWith('B-')@" quantity="1">
            <name>@equalsIgnoreCase('notebook')@</name>
            <price>4.25</price>
        </item>
    </items>
    <total>@greaterThan(5)@</total>
    <meta:trace>@ignore@</meta:trace>
</order>"#;

pub fn order_with(from: &str, to: &str) -> String {
    assert!(ORDER.contains(from), "fixture does not contain {:?}", from);
    ORDER.replacen(from, to, 1)
}
