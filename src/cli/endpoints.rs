//! Endpoints command implementation

use crate::cli::output::{format_endpoints_json, format_endpoints_table, EndpointView};
use crate::cli::EndpointsArgs;
use crate::endpoints::EndpointName;

/// Handle `orion endpoints` command
pub fn handle_endpoints(args: &EndpointsArgs) -> String {
    let views: Vec<EndpointView> = EndpointName::ALL.into_iter().map(EndpointView::from).collect();

    if args.json {
        format_endpoints_json(&views)
    } else {
        format_endpoints_table(&views)
    }
}
