use crate::{
    model::{Gender, Outfit, WeatherFeatures},
    select::contains_any,
};

const WARM_TOPS: &[&str] = &[
    "puffer", "parka", "coat", "thermal", "hoodie", "sweater", "fleece", "insulated", "down_",
    "quilted", "jacket", "cardigan", "windbreaker",
];
const LIGHT_TOPS: &[&str] = &["tshirt", "tank", "blouse", "shirt", "tee"];
const SNOW_READY: &[&str] = &["snow", "winter", "insulated", "waterproof"];
const WATERPROOF: &[&str] = &["waterproof", "gumboot", "rainboot", "rain_boot", "wellington"];
const COLD_ACCESSORIES: &[&str] = &["scarf", "gloves", "mittens", "hat", "beanie", "topi"];

pub const LAYERING_BELOW_C: f64 = 7.0;
pub const COLD_ACCESSORY_MAX_C: f64 = 5.0;
pub const HOT_ACCESSORY_MIN_C: f64 = 26.0;
pub const SHORTS_MIN_C: f64 = 20.0;

/// Advice in slot order: top, bottom, footwear, accessory or weather, then layering.
pub fn generate_tips(outfit: &Outfit, gender: Gender, features: &WeatherFeatures) -> Vec<String> {
    let mut tips = Vec::with_capacity(6);
    tips.push(top_tip(&outfit.top));
    tips.push(bottom_tip(&outfit.bottom, gender, features.temperature_c));
    tips.extend(footwear_tips(&outfit.footwear, features));
    tips.extend(accessory_tip(&outfit.accessory, features));

    if features.temperature_c < LAYERING_BELOW_C {
        tips.push(
            "Layer up: a base layer, an insulating mid layer and a wind-proof outer shell \
             trap heat best."
                .to_string(),
        );
    }
    tips
}

fn top_tip(label: &str) -> String {
    let name = humanize(label);
    if contains_any(label, WARM_TOPS) {
        format!("Your {name} will keep you warm; zip or button it up when you're outside.")
    } else if contains_any(label, LIGHT_TOPS) {
        format!("Your {name} is light and breathable, ideal for mild weather.")
    } else {
        format!("Pick a {name} in a fabric you're comfortable moving in.")
    }
}

fn bottom_tip(label: &str, gender: Gender, temperature_c: f64) -> String {
    let name = humanize(label);
    if label.contains("skirt") && gender != Gender::Female {
        format!("Your {name} can feel chilly; consider tights or switching to trousers.")
    } else if label.contains("shorts") && temperature_c < SHORTS_MIN_C {
        format!("It may be too cold for {name}; long pants would keep your legs warm.")
    } else {
        format!("{} should be comfortable today.", capitalize(&name))
    }
}

fn footwear_tips(label: &str, features: &WeatherFeatures) -> Vec<String> {
    let name = humanize(label);
    let mut tips = Vec::new();
    if features.snow && !contains_any(label, SNOW_READY) {
        tips.push(format!(
            "Snow is expected; insulated, waterproof snow boots will grip better than {name}."
        ));
    }
    if features.rain && !contains_any(label, WATERPROOF) {
        tips.push(format!(
            "Wet ground ahead; waterproof footwear will keep your feet drier than {name}."
        ));
    }
    if tips.is_empty() {
        tips.push(format!("{} should work well today.", capitalize(&name)));
    }
    tips
}

fn accessory_tip(label: &str, features: &WeatherFeatures) -> Option<String> {
    if features.rain {
        return Some("Rain is likely; carry an umbrella or wear a raincoat.".to_string());
    }
    if features.snow {
        return Some("Snow is on the way; wear a warm hat and gloves.".to_string());
    }
    if label == "none" {
        return None;
    }

    let name = humanize(label);
    let t = features.temperature_c;
    let tip = if t <= COLD_ACCESSORY_MAX_C {
        if contains_any(label, COLD_ACCESSORIES) {
            format!("Your {name} will help keep the cold out.")
        } else {
            format!("It's cold; add a scarf, gloves or a warm hat alongside your {name}.")
        }
    } else if t >= HOT_ACCESSORY_MIN_C {
        format!("Your {name} helps with sun and heat; stay hydrated and seek shade.")
    } else {
        format!("Your {name} complements your outfit nicely.")
    };
    Some(tip)
}

fn humanize(label: &str) -> String {
    label.replace(['_', '-'], " ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
