//! Natural-language instruction sent to the AI backend

use crate::types::Coordinates;

/// Build the grounded-search instruction for `business_type` near `location`
pub fn build_prompt(business_type: &str, location: Coordinates) -> String {
    format!(
        "Using Google Maps data, find '{business_type}' near the user's location \
         ({latitude}, {longitude}) that DO NOT have a website listed.\n\
         Restrict the search to places close to that location.\n\
         For each business found, provide its name, full address, phone number (if available), \
         the direct Google Maps URL, and its website (if one is listed).\n\
         Return the results as a valid JSON array of objects.\n\
         Each object must have exactly the following keys: \"name\", \"address\", \"phone\", \"mapsUrl\", and \"website\".\n\
         If a phone number or website is not available, set its value to null.\n\
         If no businesses are found that meet the criteria, return an empty JSON array.\n\
         Do not include any explanatory text or markdown formatting outside of the JSON array itself.",
        business_type = business_type.trim(),
        latitude = location.latitude,
        longitude = location.longitude,
    )
}
