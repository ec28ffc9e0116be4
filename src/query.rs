//! Extraction of query parameters from a raw query string.

use crate::{error::Result, multimap::MultiMap, percent};

/// Query parameters in both of their shadow forms.
///
/// The keys of *both* maps are decoded names; only the values of the
/// `encoded` map stay in their raw percent-encoded form.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct QueryParams {
    pub(crate) decoded: MultiMap,
    pub(crate) encoded: MultiMap,
}

/// Splits a raw query string on `&` and accumulates the parameters.
///
/// A token containing `=` splits on its first occurrence, with a missing
/// tail yielding an empty-string value; a token without `=` is a name with
/// an explicit empty-string value. Repeated names accumulate in arrival
/// order. Empty tokens contribute nothing.
pub(crate) fn extract(raw_query: &str) -> Result<QueryParams> {
    let mut params = QueryParams::default();
    if raw_query.is_empty() {
        return Ok(params);
    }
    for token in raw_query.split('&') {
        if token.is_empty() {
            continue;
        }
        match token.find('=') {
            Some(pos) => {
                let name = percent::decode_query(&token[..pos], "query parameter name")?;
                let raw_value = &token[pos + 1..];
                let value = percent::decode_query(raw_value, "query parameter value")?;
                params.encoded.append(name.clone(), raw_value);
                params.decoded.append(name, value);
            }
            None => {
                let name = percent::decode_query(token, "query parameter name")?;
                params.encoded.append(name.clone(), "");
                params.decoded.append(name, "");
            }
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_and_bare_token() {
        let params = extract("a=1&a=2&b").unwrap();
        assert_eq!(
            params.decoded.get("a"),
            Some(&["1".to_owned(), "2".to_owned()][..])
        );
        assert_eq!(params.decoded.get("b"), Some(&["".to_owned()][..]));
        assert_eq!(params.encoded.get("b"), Some(&["".to_owned()][..]));
    }

    #[test]
    fn values_stay_raw_in_the_encoded_map() {
        let params = extract("name=John%20Doe").unwrap();
        assert_eq!(params.decoded.get("name"), Some(&["John Doe".to_owned()][..]));
        assert_eq!(
            params.encoded.get("name"),
            Some(&["John%20Doe".to_owned()][..])
        );
    }

    #[test]
    fn names_are_decoded_in_both_maps() {
        let params = extract("na%20me=x%2By").unwrap();
        assert_eq!(params.encoded.get("na me"), Some(&["x%2By".to_owned()][..]));
        assert_eq!(params.decoded.get("na me"), Some(&["x+y".to_owned()][..]));
    }

    #[test]
    fn plus_folds_to_space() {
        let params = extract("name=John+Doe").unwrap();
        assert_eq!(params.decoded.get("name"), Some(&["John Doe".to_owned()][..]));
    }

    #[test]
    fn trailing_equals_yields_empty_value() {
        let params = extract("a=").unwrap();
        assert_eq!(params.decoded.get("a"), Some(&["".to_owned()][..]));
    }

    #[test]
    fn empty_query_yields_no_parameters() {
        let params = extract("").unwrap();
        assert!(params.decoded.is_empty());
        assert!(params.encoded.is_empty());
    }

    #[test]
    fn empty_tokens_are_skipped() {
        let params = extract("a=1&&b=2").unwrap();
        assert_eq!(params.decoded.len(), 2);
    }

    #[test]
    fn arrival_order_is_preserved_across_names() {
        let params = extract("z=1&a=2&z=3").unwrap();
        assert_eq!(params.decoded.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(
            params.decoded.get("z"),
            Some(&["1".to_owned(), "3".to_owned()][..])
        );
    }
}
