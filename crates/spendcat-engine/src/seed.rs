//! Built-in seed dataset.
//!
//! Hand-labelled transaction descriptions in the style of mobile-money and
//! card statements. Every category has several samples so a model fit on the
//! seed alone covers the full enumeration.

use spendcat_core::{CategorySlug, TrainingSample};

use CategorySlug::*;

/// Ordered `(description, label)` pairs.
pub static SEED_SAMPLES: &[(&str, CategorySlug)] = &[
    // food-dining
    ("Java House coffee Westgate", FoodDining),
    ("Artcaffe breakfast Yaya Centre", FoodDining),
    ("KFC Moi Avenue chicken bucket", FoodDining),
    ("Naivas supermarket groceries", FoodDining),
    ("Carrefour Two Rivers food shopping", FoodDining),
    ("Pizza Inn Ngong Road", FoodDining),
    ("Uber Eats dinner delivery", FoodDining),
    ("Glovo lunch order", FoodDining),
    ("Quickmart vegetables and milk", FoodDining),
    ("Kilimanjaro restaurant nyama choma", FoodDining),
    ("Dormans coffee beans", FoodDining),
    ("Mama mboga sukuma wiki", FoodDining),
    // transport
    ("Uber ride to Westlands", Transport),
    ("Uber trip home from office", Transport),
    ("Bolt ride to JKIA airport", Transport),
    ("Little Cab taxi fare", Transport),
    ("Matatu fare to Rongai", Transport),
    ("Shell petrol station fuel", Transport),
    ("Total Energies diesel refill", Transport),
    ("SGR train ticket Mombasa", Transport),
    ("Kenya Airways flight booking", Transport),
    ("Parking fee Sarit Centre", Transport),
    ("Boda boda motorbike ride", Transport),
    ("Car service and oil change", Transport),
    // social
    ("Drinks with friends at Alchemist bar", Social),
    ("Wedding contribution harambee", Social),
    ("Birthday gift for Wanjiru", Social),
    ("Chama monthly contribution", Social),
    ("Church tithe offering", Social),
    ("Send money to mum M-Pesa", Social),
    ("Funeral committee contribution", Social),
    ("Baby shower present", Social),
    ("Office farewell party collection", Social),
    ("Dowry ceremony goat purchase", Social),
    // entertainment
    ("Netflix monthly subscription", Entertainment),
    ("Showmax premium plan", Entertainment),
    ("Spotify premium family", Entertainment),
    ("IMAX cinema tickets Garden City", Entertainment),
    ("DStv Compact bouquet renewal", Entertainment),
    ("PlayStation store game purchase", Entertainment),
    ("Concert tickets Koroga festival", Entertainment),
    ("YouTube Premium membership", Entertainment),
    ("Bowling at Village Market", Entertainment),
    ("Apple Music subscription", Entertainment),
    // utilities
    ("KPLC prepaid electricity tokens", Utilities),
    ("KPLC postpaid power bill", Utilities),
    ("Nairobi Water bill payment", Utilities),
    ("Safaricom Home Fibre internet", Utilities),
    ("Zuku internet and tv package", Utilities),
    ("Airtime top up Safaricom", Utilities),
    ("Safaricom data bundles", Utilities),
    ("Gas refill 13kg cylinder", Utilities),
    ("Garbage collection monthly fee", Utilities),
    ("Faiba 4G data plan", Utilities),
    // health
    ("Goodlife Pharmacy prescription", Health),
    ("Aga Khan Hospital consultation", Health),
    ("Nairobi Hospital lab tests", Health),
    ("Dentist appointment cleaning", Health),
    ("NHIF monthly contribution", Health),
    ("Optician eye glasses", Health),
    ("Gym membership Planet Fitness", Health),
    ("Malaria medication chemist", Health),
    ("Physiotherapy session", Health),
    ("Jubilee health insurance premium", Health),
    // education
    ("School fees term two", Education),
    ("University tuition payment", Education),
    ("Textbooks at Text Book Centre", Education),
    ("Udemy online course", Education),
    ("Coursera certificate subscription", Education),
    ("School uniform and stationery", Education),
    ("KCSE exam registration fee", Education),
    ("Driving school lessons", Education),
    ("Tuition classes for kids", Education),
    ("Library membership fee", Education),
    // clothing
    ("Mr Price clothes Sarit", Clothing),
    ("LC Waikiki jeans and shirts", Clothing),
    ("Bata shoes Kimathi Street", Clothing),
    ("Gikomba mitumba clothes", Clothing),
    ("Tailor suit stitching", Clothing),
    ("Nike sneakers purchase", Clothing),
    ("Woolworths dress", Clothing),
    ("Deacons kids clothing", Clothing),
    ("Jacket from Toi market", Clothing),
    ("Laundry and dry cleaning", Clothing),
    // rent-housing
    ("Monthly rent payment landlord", RentHousing),
    ("House rent Kilimani apartment", RentHousing),
    ("Service charge apartment block", RentHousing),
    ("Rent deposit new house", RentHousing),
    ("Caretaker fee estate", RentHousing),
    ("Mortgage repayment HF Group", RentHousing),
    ("Plumber repair kitchen sink", RentHousing),
    ("Furniture from Victoria Courts", RentHousing),
    ("Paint and hardware for house", RentHousing),
    ("Airbnb stay booking", RentHousing),
    // savings
    ("Transfer to M-Shwari savings", Savings),
    ("KCB M-Pesa lock savings", Savings),
    ("Money market fund deposit CIC", Savings),
    ("Sacco shares contribution Stima", Savings),
    ("Fixed deposit account top up", Savings),
    ("Treasury bill investment CBK", Savings),
    ("Emergency fund transfer", Savings),
    ("Pension contribution NSSF", Savings),
    ("Stock purchase NSE shares", Savings),
    ("Save to Ziidi fund", Savings),
    // income
    ("Salary deposit from employer", Income),
    ("Monthly salary credit", Income),
    ("Freelance payment received Upwork", Income),
    ("Client invoice payment received", Income),
    ("Dividend payout Safaricom shares", Income),
    ("Rental income from tenant", Income),
    ("Bonus payment credited", Income),
    ("Refund received from merchant", Income),
    ("Interest earned on savings account", Income),
    ("Side business sales M-Pesa till", Income),
    // other
    ("ATM withdrawal cash", Other),
    ("Bank charges monthly fee", Other),
    ("M-Pesa transaction cost", Other),
    ("Miscellaneous purchase", Other),
    ("Unknown merchant payment", Other),
    ("Lottery ticket SportPesa bet", Other),
    ("Loan repayment Fuliza", Other),
    ("Government service eCitizen fee", Other),
    ("Passport application fee", Other),
    ("Tax payment KRA iTax", Other),
];

/// The seed dataset as owned training samples.
pub fn seed_samples() -> Vec<TrainingSample> {
    SEED_SAMPLES
        .iter()
        .map(|(text, label)| TrainingSample::new(*text, *label))
        .collect()
}
