//! Query builders: FetchXML joins through package membership and OData
//! filter expressions.

use html_escape::encode_single_quoted_attribute;
use url::form_urlencoded;

/// Percent-encode a query-string component. Spaces become `%20`.
pub fn encode(value: &str) -> String {
    // byte_serialize emits '+' for space and "%2B" for a literal plus
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Cloud flows (category 5) that are components of `package`.
pub fn workflows_in_package(package: &str) -> String {
    format!(
        "<fetch>\
<entity name='workflow'>\
<attribute name='name'/>\
<attribute name='workflowid'/>\
<attribute name='clientdata'/>\
<filter><condition attribute='category' operator='eq' value='5'/></filter>\
{}\
</entity>\
</fetch>",
        membership_join("workflowid", package)
    )
}

/// Connection references that are components of `package`.
pub fn connection_references_in_package(package: &str) -> String {
    format!(
        "<fetch>\
<entity name='connectionreference'>\
<attribute name='connectionreferenceid'/>\
<attribute name='connectionreferencelogicalname'/>\
<attribute name='connectionreferencedisplayname'/>\
<attribute name='connectionid'/>\
<attribute name='connectorid'/>\
{}\
</entity>\
</fetch>",
        membership_join("connectionreferenceid", package)
    )
}

fn membership_join(id_attribute: &str, package: &str) -> String {
    format!(
        "<link-entity name='solutioncomponent' from='objectid' to='{id_attribute}' link-type='inner'>\
<link-entity name='solution' from='solutionid' to='solutionid' link-type='inner'>\
<filter><condition attribute='uniquename' operator='eq' value='{}'/></filter>\
</link-entity>\
</link-entity>",
        encode_single_quoted_attribute(package)
    )
}

/// Endpoint for an entity set queried with FetchXML.
pub fn fetch_endpoint(entity_set: &str, fetch_xml: &str) -> String {
    format!("{entity_set}?fetchXml={}", encode(fetch_xml))
}

/// `{field} eq '{value}'` with the value quoted for OData and URL-encoded.
pub fn odata_filter_eq(field: &str, value: &str) -> String {
    encode(&format!("{field} eq '{}'", value.replace('\'', "''")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_percent_twenty() {
        assert_eq!(encode("a b+c"), "a%20b%2Bc");
        assert_eq!(encode("<x='1'/>"), "%3Cx%3D%271%27%2F%3E");
    }

    #[test]
    fn test_workflow_query_filters_category_and_package() {
        let xml = workflows_in_package("MySolution");
        assert!(xml.contains("<entity name='workflow'>"));
        assert!(xml.contains("attribute='category' operator='eq' value='5'"));
        assert!(xml.contains("to='workflowid'"));
        assert!(xml.contains("attribute='uniquename' operator='eq' value='MySolution'"));
    }

    #[test]
    fn test_package_name_is_escaped() {
        let xml = connection_references_in_package("O'Brien & <Co>");
        assert!(xml.contains("to='connectionreferenceid'"));

        let start = xml.find("operator='eq' value='").unwrap() + "operator='eq' value='".len();
        let value = &xml[start..start + xml[start..].find('\'').unwrap()];
        assert!(value.contains("&amp;"));
        assert!(value.contains("&lt;Co"));
        assert!(!value.contains('<'));
        assert_eq!(html_escape::decode_html_entities(value), "O'Brien & <Co>");
    }

    #[test]
    fn test_fetch_endpoint_is_encoded() {
        let endpoint = fetch_endpoint("workflows", "<fetch/>");
        assert_eq!(endpoint, "workflows?fetchXml=%3Cfetch%2F%3E");
    }

    #[test]
    fn test_odata_filter_doubles_quotes() {
        let filter = odata_filter_eq("connectionreferencelogicalname", "a'b");
        assert_eq!(
            filter,
            "connectionreferencelogicalname%20eq%20%27a%27%27b%27"
        );
    }
}
