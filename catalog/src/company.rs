use crate::errors::CatalogError;
use std::fmt;

/// An upstream company API known to the aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Company {
    Amz,
    Flp,
    Snp,
    Myn,
    Azo,
}

impl Company {
    /// The whitelist, in the order upstream results are concatenated.
    pub const ALL: [Company; 5] = [
        Company::Amz,
        Company::Flp,
        Company::Snp,
        Company::Myn,
        Company::Azo,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Company::Amz => "AMZ",
            Company::Flp => "FLP",
            Company::Snp => "SNP",
            Company::Myn => "MYN",
            Company::Azo => "AZO",
        }
    }

    /// Resolves the `companies` query parameter against the whitelist.
    ///
    /// A missing or empty filter selects every company. Otherwise the filter is
    /// split on `,` and unknown codes are dropped; the result keeps whitelist
    /// order regardless of the order the caller listed them in.
    pub fn resolve(filter: Option<&str>) -> Result<Vec<Company>, CatalogError> {
        let requested = match filter {
            Some(list) if !list.is_empty() => list.split(',').collect::<Vec<_>>(),
            _ => return Ok(Company::ALL.to_vec()),
        };

        let selected: Vec<Company> = Company::ALL
            .into_iter()
            .filter(|company| requested.contains(&company.as_str()))
            .collect();

        if selected.is_empty() {
            return Err(CatalogError::NoValidCompanies);
        }

        Ok(selected)
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
